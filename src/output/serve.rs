use crate::output::DynLazy;
use http::{Method, Response, StatusCode, Uri, Version};
use httparse::Status;
use std::{
    collections::HashMap,
    io::{self, Read, Write},
    net::{TcpListener, TcpStream},
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        LazyLock, Mutex,
    },
    thread::available_parallelism,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Serves `output` on `address`, rendering files in the background meanwhile.
pub fn serve(
    start: Instant,
    address: &str,
    output: &HashMap<String, DynLazy<'_, Vec<u8>>>,
) -> io::Result<()> {
    let listener = TcpListener::bind(address)?;
    info!(
        "({:.1}s) Serving on http://{}",
        start.elapsed().as_secs_f32(),
        listener.local_addr()?
    );
    serve_listener(start, listener, output)
}

/// Accepts connections forever.
pub fn serve_listener(
    start: Instant,
    listener: TcpListener,
    output: &HashMap<String, DynLazy<'_, Vec<u8>>>,
) -> io::Result<()> {
    let background_threads = &AtomicUsize::new(0);
    let http_threads = &AtomicUsize::new(0);
    let mut queue = output.iter().collect::<Vec<_>>();
    // Pages first, they're what visitors ask for.
    queue.sort_by_key(|(path, _)| !path.ends_with(".html"));
    let work = &Mutex::new(queue.into_iter());
    let available_parallelism = available_parallelism()
        .map(|n| n.get())
        .unwrap_or_default()
        .max(1);

    std::thread::scope(|scope| {
        // Background initialization.
        let cpus = (available_parallelism / 2).clamp(1, 4);
        for thread in 0..cpus {
            let guard = Guard::new(background_threads);
            scope.spawn(move || {
                let guard = guard;
                while let Some((_, file)) = next_work(work) {
                    LazyLock::force(file);
                    while http_threads.load(Ordering::SeqCst) > thread {
                        std::thread::sleep(Duration::from_millis(100));
                    }
                }

                drop(guard);

                if background_threads.load(Ordering::SeqCst) == 0 {
                    info!(
                        "({:.1}s) Background rendering complete",
                        start.elapsed().as_secs_f32(),
                    );
                }
            });
        }

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("accept failed: {e}");
                    continue;
                }
            };
            scope.spawn(move || {
                let _guard = Guard::new(http_threads);
                if let Err(e) = handle(stream, output) {
                    debug!("connection: {e}");
                }
            });
        }
    });
    Ok(())
}

fn next_work<I: Iterator>(work: &Mutex<I>) -> Option<I::Item> {
    work.lock().ok()?.next()
}

fn handle(
    mut stream: TcpStream,
    output: &HashMap<String, DynLazy<'_, Vec<u8>>>,
) -> io::Result<()> {
    let mut buf = Vec::new();

    let request = loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp)? {
            0 => return Ok(()),
            n => buf.extend_from_slice(&tmp[0..n]),
        }

        let mut headers = [httparse::EMPTY_HEADER; 128];
        let mut parse_req = httparse::Request::new(&mut headers);
        let res = parse_req
            .parse(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Status::Complete(_) = res {
            let (Some(method), Some(uri)) = (
                parse_req.method.and_then(|m| Method::from_str(m).ok()),
                parse_req.path.and_then(|p| Uri::from_str(p).ok()),
            ) else {
                return Ok(());
            };
            let mut builder = http::Request::builder().method(method).uri(uri).version(
                if parse_req.version == Some(1) {
                    Version::HTTP_11
                } else {
                    Version::HTTP_10
                },
            );
            for header in parse_req.headers.iter() {
                builder = builder.header(header.name, header.value);
            }
            break builder
                .body(())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }
    };

    let mut path = request.uri().path().to_owned();
    if path.ends_with('/') {
        path.push_str("index.html")
    }

    let (status, body): (StatusCode, &[u8]) = match output.get(&path) {
        Some(file) if request.method() == Method::GET || request.method() == Method::HEAD => {
            (StatusCode::OK, file.as_slice())
        }
        Some(_) => (StatusCode::METHOD_NOT_ALLOWED, &b"method not allowed"[..]),
        None => (StatusCode::NOT_FOUND, &b"not found"[..]),
    };

    let response = Response::builder()
        .version(request.version())
        .status(status)
        .header("Content-Type", content_type(&path, status))
        .header("Content-Length", body.len())
        .body(if request.method() == Method::HEAD {
            &[][..]
        } else {
            body
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    info!("[{}] {}", response.status(), request.uri());

    let status_line = format!(
        "{:?} {} {}\r\n",
        response.version(),
        response.status().as_u16(),
        response.status().canonical_reason().unwrap_or("")
    );

    let mut headers = String::new();
    for (name, value) in response.headers() {
        headers.push_str(&format!("{}: {}\r\n", name, value.to_str().unwrap_or("")));
    }
    headers.push_str("Connection: close\r\n\r\n");

    stream.write_all(status_line.as_bytes())?;
    stream.write_all(headers.as_bytes())?;
    stream.write_all(response.body())?;
    stream.flush()
}

fn content_type(path: &str, status: StatusCode) -> &'static str {
    if !status.is_success() {
        return "text/plain; charset=utf-8";
    }
    match path.rsplit_once('.').map(|(_, extension)| extension) {
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

struct Guard<'a>(&'a AtomicUsize);

impl<'a> Guard<'a> {
    pub fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl<'a> Drop for Guard<'a> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy(body: &'static [u8]) -> DynLazy<'static, Vec<u8>> {
        LazyLock::new(Box::new(move || body.to_vec()))
    }

    #[test]
    fn serves_output() {
        let output = HashMap::from([
            ("/index.html".to_owned(), lazy(b"<p>home</p>")),
            ("/data.json".to_owned(), lazy(b"{}")),
        ]);
        let output: &'static _ = Box::leak(Box::new(output));
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        std::thread::spawn(move || serve_listener(Instant::now(), listener, output));

        let get = |path: &str| {
            let mut stream = TcpStream::connect(address).unwrap();
            write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            response
        };

        let home = get("/");
        assert!(home.starts_with("HTTP/1.1 200 OK\r\n"), "{home}");
        assert!(home.contains("content-type: text/html; charset=utf-8\r\n"), "{home}");
        assert!(home.ends_with("\r\n\r\n<p>home</p>"), "{home}");

        let data = get("/data.json");
        assert!(data.contains("content-type: application/json\r\n"), "{data}");

        let missing = get("/nope/");
        assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"), "{missing}");
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type("/robots.txt", StatusCode::OK), "text/plain; charset=utf-8");
        assert_eq!(content_type("/sitemap.xml", StatusCode::OK), "application/xml");
        assert_eq!(content_type("/x.html", StatusCode::NOT_FOUND), "text/plain; charset=utf-8");
    }
}
