use clap::{App, Arg};
use lodestar::config::ServerConfig;
use lodestar::logging;
use lodestar::session::Session;
use std::net::TcpListener;
use std::process;
use std::thread;

pub fn main() {
    let matches = App::new("Pilot Service")
        .version("1.0")
        .author("Bush Hammer Industries")
        .about("Authenticates robot clients and guides them to the grid origin.")
        .arg(
            Arg::with_name("CONFIG_FILE")
                .help("Path to the config file")
                .required(false),
        )
        .get_matches();

    let config = match matches.value_of("CONFIG_FILE") {
        Some(path) => ServerConfig::load(path),
        None => ServerConfig::default(),
    };

    let log = logging::init();
    let address = config.address();

    let listener = match TcpListener::bind(&address) {
        Ok(listener) => listener,
        Err(err) => {
            logging::error!(log, "server failed to start";
                            "context" => "main",
                            "address" => %address,
                            "error" => %err);
            process::exit(1);
        }
    };

    logging::info!(log, "server started"; "context" => "main", "address" => %address);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let peer = match stream.peer_addr() {
                    Ok(addr) => addr.to_string(),
                    Err(_) => "unknown".to_string(),
                };

                logging::info!(log, "client connected"; "context" => "main", "peer" => %peer);

                let session_log = log.new(logging::o!("peer" => peer));

                thread::spawn(move || Session::new(stream, &session_log).run());
            }
            Err(err) => {
                logging::warn!(log, "connection not accepted";
                               "context" => "main",
                               "error" => %err);
            }
        }
    }
}
