//! Security headers middleware.
//!
//! Everything is locked down except what the storefront needs to hand off to
//! Stripe: Stripe.js on the redirect page, product images served from
//! Stripe's file hosts, and the form post to hosted checkout.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Build the Content-Security-Policy for a response.
///
/// ```text
/// default-src 'none';
/// script-src 'self' https://js.stripe.com 'nonce-…';
/// style-src 'self';
/// img-src 'self' https:;
/// connect-src 'self' https://api.stripe.com;
/// frame-src https://js.stripe.com https://checkout.stripe.com;
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self' https://checkout.stripe.com;
/// frame-ancestors 'none'
/// ```
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let script_src = match nonce.map(CspNonce::value).filter(|n| !n.is_empty()) {
        Some(n) => format!("script-src 'self' https://js.stripe.com 'nonce-{n}'"),
        None => "script-src 'self' https://js.stripe.com".to_string(),
    };

    [
        "default-src 'none'",
        &script_src,
        "style-src 'self'",
        "img-src 'self' https:",
        "connect-src 'self' https://api.stripe.com",
        "frame-src https://js.stripe.com https://checkout.stripe.com",
        "object-src 'none'",
        "base-uri 'self'",
        "form-action 'self' https://checkout.stripe.com",
        "frame-ancestors 'none'",
    ]
    .join("; ")
}

/// Add security headers to all responses.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let csp = content_security_policy(request.extensions().get::<CspNonce>());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Hosted checkout reads the referrer origin for its back link
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    match HeaderValue::from_str(&csp) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!("Invalid CSP header value: {e}"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             geolocation=(), \
             microphone=(), \
             usb=(), \
             payment=(self \"https://js.stripe.com\")",
        ),
    );

    // Carts are per-visitor; never cache rendered pages
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // Product images come from Stripe's file hosts without CORP headers
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce() {
        let nonce = CspNonce("abc123".to_string());
        let csp = content_security_policy(Some(&nonce));
        assert!(csp.contains("script-src 'self' https://js.stripe.com 'nonce-abc123'"));
        assert!(csp.contains("form-action 'self' https://checkout.stripe.com"));
    }

    #[test]
    fn test_csp_without_nonce() {
        let csp = content_security_policy(None);
        assert!(!csp.contains("nonce-"));
        assert!(csp.starts_with("default-src 'none'"));

        let empty = CspNonce(String::new());
        assert!(!content_security_policy(Some(&empty)).contains("nonce-"));
    }
}
