use std::sync::Arc;

use nppsim::error::PlantError;
use nppsim::plant::PlantSimulator;
use nppsim::protocol::{ProtocolHandler, Request, RequestKind, Response, ResponseStatus};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const TCP_PORT: u16 = 8090;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Nuclear Power Plant Simulator");
    println!("=============================");

    let simulator = Arc::new(Mutex::new(PlantSimulator::new()));

    let listener = TcpListener::bind(format!("127.0.0.1:{TCP_PORT}")).await?;
    info!("control server listening on port {}", TCP_PORT);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("new controller connected: {}", addr);
                let client_simulator = Arc::clone(&simulator);

                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, client_simulator).await {
                        warn!("controller {} error: {}", addr, e);
                    }
                    info!("controller {} disconnected", addr);
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(
    stream: TcpStream,
    simulator: Arc<Mutex<PlantSimulator>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut buf_reader = BufReader::new(reader);
    let mut handler = ProtocolHandler::new();

    let mut line = String::new();
    loop {
        line.clear();
        match buf_reader.read_line(&mut line).await {
            Ok(0) => break, // Controller disconnected
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match handler.parse_request(trimmed) {
                    Ok(request) => {
                        let mut simulator_guard = simulator.lock().await;
                        apply_request(&mut simulator_guard, &handler, request)
                    }
                    Err(e) => {
                        warn!("rejected request: {}", e);
                        handler.error_response(0, ResponseStatus::InvalidRequest, &e.to_string())
                    }
                };

                let response_json = handler.serialize_response(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            Err(e) => {
                error!("error reading from controller: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn apply_request(
    simulator: &mut PlantSimulator,
    handler: &ProtocolHandler,
    request: Request,
) -> Response {
    match request.kind {
        RequestKind::Reset => {
            let observation = simulator.reset();
            handler.observation_response(request.id, observation)
        }
        RequestKind::Observe | RequestKind::Status => {
            handler.observation_response(request.id, simulator.observe())
        }
        RequestKind::Step { code } => match simulator.step_code(code) {
            Ok(outcome) => handler.step_response(request.id, &outcome),
            Err(PlantError::InvalidAction { code }) => {
                handler.invalid_action_response(request.id, code)
            }
        },
    }
}
