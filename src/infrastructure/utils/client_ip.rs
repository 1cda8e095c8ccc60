use std::net::SocketAddr;

use actix_web::HttpRequest;

/// Key identifying the calling client for throttling. Forwarding headers are
/// honoured only when the deployment sits behind a trusted proxy.
pub fn client_key(req: &HttpRequest, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return strip_port(addr);
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> String {
    addr.parse::<SocketAddr>()
        .map(|socket| socket.ip().to_string())
        .unwrap_or_else(|_| addr.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn ignores_forwarded_header_unless_trusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .peer_addr("10.0.0.2:4000".parse().unwrap())
            .to_http_request();

        assert_eq!(client_key(&req, false), "10.0.0.2");
        assert_eq!(client_key(&req, true), "203.0.113.7");
    }

    #[test]
    fn strips_ports() {
        assert_eq!(strip_port("10.0.0.2:4000"), "10.0.0.2");
        assert_eq!(strip_port("[::1]:80"), "::1");
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
    }
}
