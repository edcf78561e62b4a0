use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::{env, process};

use framelink::cancel::CancelToken;
use framelink::config::RelayConfig;
use framelink::dial::Dialer;
use framelink::log::log_sink::LogSink;
use framelink::log::logger::Logger;
use framelink::relay::relay_duplex;
use framelink::{sink_info, sink_warn};

/// How long one upstream dial may take before its session is abandoned.
const DIAL_DEADLINE: Duration = Duration::from_secs(10);

fn main() -> std::io::Result<()> {
    // --- Config + CLI args -------------------------------------------------
    //
    // Supported:
    //   relay_server
    //      -> addresses from FRAMELINK_CONFIG / relay.conf (or defaults)
    //
    //   relay_server 0.0.0.0:4040 10.0.0.7:9000
    //      -> listen addr + upstream addr
    let mut cfg = RelayConfig::load(&RelayConfig::default_path()).unwrap_or_default();

    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => {}
        3 => {
            cfg.listen_addr = args[1].clone();
            cfg.upstream_addr = args[2].clone();
        }
        _ => {
            eprintln!("Usage:");
            eprintln!("  {}                       # addresses from config", args[0]);
            eprintln!("  {} [LISTEN] [UPSTREAM]   # e.g. 0.0.0.0:4040 10.0.0.7:9000", args[0]);
            process::exit(1);
        }
    }

    // --- Start process logger ----------------------------------------------
    let logger = match &cfg.log_dir {
        Some(dir) => Logger::start_in_dir(dir, "relay_server", 1024),
        None => Logger::start_default("relay_server", 1024),
    };
    let log: Arc<dyn LogSink> = Arc::new(logger.handle());

    eprintln!(
        "[relay_server] {} -> {} (log: {})",
        cfg.listen_addr,
        cfg.upstream_addr,
        logger.file_path().display()
    );

    // --- Accept loop (blocks) ----------------------------------------------
    let listener = TcpListener::bind(&cfg.listen_addr)?;
    sink_info!(
        log,
        "listening on {} forwarding to {}",
        cfg.listen_addr,
        cfg.upstream_addr
    );

    let mut next_session_id: u64 = 1;
    for stream in listener.incoming() {
        let downstream = match stream {
            Ok(s) => s,
            Err(e) => {
                sink_warn!(log, "accept failed: {e} (continuing to accept)");
                continue;
            }
        };

        let session_id = next_session_id;
        next_session_id += 1;

        let upstream_addr = cfg.upstream_addr.clone();
        let log = log.clone();
        thread::spawn(move || run_session(session_id, downstream, &upstream_addr, &log));
    }

    Ok(())
}

/// One relay session: dial upstream, then pump both directions until either
/// side closes. A failing session only ever takes itself down.
fn run_session(
    session_id: u64,
    downstream: TcpStream,
    upstream_addr: &str,
    log: &Arc<dyn LogSink>,
) {
    let peer = downstream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_owned());
    sink_info!(log, "[session {session_id}] accepted {peer}");

    let token = CancelToken::with_deadline(DIAL_DEADLINE);
    let upstream = match Dialer::new().dial(upstream_addr, &token) {
        Ok(s) => s,
        Err(e) => {
            sink_warn!(log, "[session {session_id}] upstream dial failed: {e}");
            return;
        }
    };

    match relay_duplex(downstream, upstream) {
        Ok(n) => sink_info!(log, "[session {session_id}] closed after {n} bytes forwarded"),
        Err(e) => sink_warn!(log, "[session {session_id}] relay error: {e}"),
    }
}
