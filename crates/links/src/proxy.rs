//! Reverse-proxy configuration generator
//!
//! The proxy that fronts the download directory verifies links on its own,
//! using only the shared secret and the signature formula. The snippet
//! rendered here is pasted into that proxy's configuration by the admin and
//! must be regenerated after every settings change.

use crate::sign::compute_signature;
use crate::SigningConfig;

/// Render an nginx + njs snippet that enforces the link contract
///
/// The output embeds the plaintext secret, so it is only ever exposed
/// through the admin-gated settings endpoint. Rendering is deterministic
/// for a given configuration.
pub fn render_proxy_config(config: &SigningConfig) -> String {
    // A known-answer vector lets the admin smoke-test the proxy before
    // going live.
    let sample_expires: i64 = 2000000000;
    let sample_signature = compute_signature(&config.secret_key, "sample.bin", sample_expires);

    format!(
        r#"# Signed download link verification for {base_url}
# Regenerate and re-deploy this block whenever the signing settings change.
#
# Contract (must match the issuing application byte for byte):
#   signature = lowercase_hex(sha256(secret_key + file_path + expires))
#   file_path = request path relative to {download_path}, without the
#               leading slash, exactly as it appears in the URL
#   expires   = unix epoch seconds; requests past expiry are denied
#
# Known-answer check:
#   sha256(secret_key + "sample.bin" + "{sample_expires}")
#     = {sample_signature}

js_import links from /etc/nginx/njs/links.js;
js_set $link_ok links.verify;

# /etc/nginx/njs/links.js
#
#   const SECRET = "{secret_key}";
#
#   function verify(r) {{
#       const expires = Number(r.args.expires);
#       if (!expires || expires < Math.floor(Date.now() / 1000)) {{
#           return "0";
#       }}
#       const path = r.uri.replace(/^\//, "");
#       const digest = require("crypto")
#           .createHash("sha256")
#           .update(SECRET + path + String(expires))
#           .digest("hex");
#       return digest === r.args.signature ? "1" : "0";
#   }}
#
#   export default {{ verify }};

server {{
    listen 443 ssl;

    location / {{
        root {download_path};

        if ($link_ok != "1") {{
            return 403;
        }}
    }}
}}
"#,
        base_url = config.base_url,
        download_path = config.download_path,
        secret_key = config.secret_key,
        sample_expires = sample_expires,
        sample_signature = sample_signature,
    )
}
