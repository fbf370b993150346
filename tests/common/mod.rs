#![allow(dead_code)]

pub mod test_server {
    use std::sync::Once;

    use methodmux::runtime_config::RuntimeConfig;

    /// Ensures the may runtime is configured only once per test binary
    static MAY_INIT: Once = Once::new();

    /// Give test coroutines a roomier stack than the 16 KB default.
    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            std::env::set_var("METHODMUX_STACK_SIZE", "0x8000");
            let config = RuntimeConfig::from_env();
            may::config().set_stack_size(config.stack_size);
        });
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::time::Duration;

    /// Reserve a free local port by binding and immediately dropping a
    /// listener, so each test server gets its own address.
    pub fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        addr
    }

    /// Send one raw HTTP request over TCP and read until the server stops
    /// sending. The request string must carry its own CRLFs.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream.write_all(req.as_bytes()).expect("write request");
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .expect("set timeout");
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Split a raw HTTP/1.x response into (status, header block, body).
    pub fn parse_response(resp: &str) -> (u16, String, String) {
        let mut parts = resp.splitn(2, "\r\n\r\n");
        let headers = parts.next().unwrap_or("").to_string();
        let body = parts.next().unwrap_or("").to_string();
        let status = headers
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .unwrap_or(0);
        (status, headers, body)
    }

    /// Case-insensitive header lookup in a raw header block.
    pub fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
        headers.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim())
            } else {
                None
            }
        })
    }
}
