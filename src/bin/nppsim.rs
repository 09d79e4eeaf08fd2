use clap::{App, Arg, ArgMatches, SubCommand};
use colored::*;
use nppsim::action::ActionCode;
use nppsim::episode::EpisodeRunner;
use nppsim::plant::{Observation, PlantSimulator};
use nppsim::policy::{ScriptedPolicy, SkipPolicy};
use nppsim::protocol::{Response, ResponseStatus};
use std::process::Command;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8090";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("nppsim")
        .version("0.1.0")
        .author("Plant Control Systems Team")
        .about("Nuclear power plant control-environment simulator")
        .arg(
            Arg::with_name("host")
                .short("h")
                .long("host")
                .value_name("HOST")
                .help("Simulator host address")
                .takes_value(true)
                .default_value(DEFAULT_HOST)
                .global(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Simulator port")
                .takes_value(true)
                .default_value(DEFAULT_PORT)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["json", "table"])
                .default_value("table")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("reset")
                .about("Reset the plant to its initial state")
        )
        .subcommand(
            SubCommand::with_name("observe")
                .about("Read the current plant observation without stepping")
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("Check that the simulator server is responsive")
        )
        .subcommand(
            SubCommand::with_name("step")
                .about("Issue one control action")
                .arg(
                    Arg::with_name("action")
                        .help("Action name (see 'nppsim actions') or numeric code")
                        .required(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("actions")
                .about("List the control action set with wire codes")
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Run a local scripted episode (no server required)")
                .arg(
                    Arg::with_name("steps")
                        .short("s")
                        .long("steps")
                        .value_name("N")
                        .help("Maximum number of steps")
                        .takes_value(true)
                        .default_value("20"),
                )
                .arg(
                    Arg::with_name("policy")
                        .long("policy")
                        .value_name("POLICY")
                        .help("Built-in policy")
                        .takes_value(true)
                        .possible_values(&["startup", "skip"])
                        .default_value("startup"),
                )
                .arg(
                    Arg::with_name("continue-on-anomaly")
                        .long("continue-on-anomaly")
                        .help("Keep stepping after an anomaly instead of stopping"),
                ),
        )
        .subcommand(
            SubCommand::with_name("server")
                .about("Start the simulator server")
                .arg(
                    Arg::with_name("background")
                        .short("b")
                        .long("background")
                        .help("Run server in background"),
                ),
        )
        .get_matches();

    let host = matches.value_of("host").unwrap();
    let port = matches.value_of("port").unwrap().parse::<u16>()?;
    let format = matches.value_of("format").unwrap();

    match matches.subcommand() {
        ("reset", _) => {
            let response = send_request(host, port, r#"{"id":1,"kind":"Reset"}"#).await?;
            print_response("Reset", &response, format);
        }
        ("observe", _) => {
            let response = send_request(host, port, r#"{"id":1,"kind":"Observe"}"#).await?;
            print_response("Observation", &response, format);
        }
        ("status", _) => {
            let response = send_request(host, port, r#"{"id":1,"kind":"Status"}"#).await?;
            match format {
                "json" => println!("{}", response),
                _ => println!("{} {}", "OK".green().bold(), "simulator is responsive"),
            }
        }
        ("step", Some(sub_matches)) => {
            handle_step(sub_matches, host, port, format).await?;
        }
        ("actions", _) => {
            print_actions();
        }
        ("run", Some(sub_matches)) => {
            handle_run(sub_matches)?;
        }
        ("server", Some(sub_matches)) => {
            handle_server(sub_matches, port)?;
        }
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            println!("{}", "Quick start:".bright_green());
            println!("  {} Start the simulator server", "nppsim server".bright_cyan());
            println!("  {} Raise the safety rods", "nppsim step safety-up".bright_cyan());
            println!("  {} Run a local scripted episode", "nppsim run".bright_cyan());
        }
    }

    Ok(())
}

async fn handle_step(
    matches: &ArgMatches<'_>,
    host: &str,
    port: u16,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = matches.value_of("action").unwrap();

    // Accept both the CLI name and the raw wire code; unknown numeric codes
    // are forwarded as-is so the server's action-mode contract applies.
    let code = match ActionCode::from_name(raw) {
        Some(action) => action.code(),
        None => match raw.parse::<u8>() {
            Ok(code) => code,
            Err(_) => {
                eprintln!("{} unknown action '{}'", "error:".red().bold(), raw);
                eprintln!("{} list valid actions with 'nppsim actions'", "hint:".yellow());
                return Ok(());
            }
        },
    };

    let request = format!(r#"{{"id":1,"kind":{{"Step":{{"code":{code}}}}}}}"#);
    let response = send_request(host, port, &request).await?;
    print_response("Step", &response, format);
    Ok(())
}

fn handle_run(matches: &ArgMatches<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let steps = matches.value_of("steps").unwrap().parse::<u32>()?;
    let policy_name = matches.value_of("policy").unwrap();

    let mut runner = EpisodeRunner::new(steps);
    if matches.is_present("continue-on-anomaly") {
        runner = runner.continue_on_anomaly();
    }

    let mut simulator = PlantSimulator::new();
    let summary = match policy_name {
        "skip" => {
            let mut policy = SkipPolicy;
            runner.run(&mut simulator, &mut policy)
        }
        _ => {
            let mut policy = ScriptedPolicy::startup();
            runner.run(&mut simulator, &mut policy)
        }
    };

    println!("{}", "Episode Summary".bright_blue().bold());
    println!("{}", "═══════════════".bright_blue());
    println!("Policy:        {}", policy_name.bright_cyan());
    println!("Steps:         {}", summary.steps.to_string().bright_white());
    println!(
        "Total reward:  {}",
        format_signed(summary.total_reward)
    );
    println!(
        "Total energy:  {}",
        format!("{:.3}", summary.total_energy).bright_white()
    );
    if summary.anomaly_tripped {
        println!("Outcome:       {}", "ANOMALY".bright_red().bold());
    } else {
        println!("Outcome:       {}", "NOMINAL".bright_green());
    }
    print_observation(&summary.final_observation);

    Ok(())
}

fn handle_server(matches: &ArgMatches<'_>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let background = matches.is_present("background");

    println!("{}", "Starting plant simulator server...".bright_green().bold());

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--bin", "nppsim-simulator"]);

    if background {
        cmd.spawn()?;
        println!("{} Server started in background on port {}", "OK".green(), port);
    } else {
        println!("Server starting on port {} (Press Ctrl+C to stop)", port);
        cmd.status()?;
    }

    Ok(())
}

async fn send_request(
    host: &str,
    port: u16,
    request: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", host, port);
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!(
                "{} failed to connect to the simulator at {}",
                "error:".red().bold(),
                addr.bright_white()
            );
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                eprintln!("{} server is not running; start it with:", "hint:".yellow());
                eprintln!("   {}", "nppsim server".bright_cyan());
            }
            return Err(e.into());
        }
    };

    let (reader, mut writer) = stream.into_split();
    writer.write_all(request.as_bytes()).await?;
    writer.write_all(b"\n").await?;

    let mut line = String::new();
    let mut buf_reader = BufReader::new(reader);
    let n = buf_reader.read_line(&mut line).await?;
    if n == 0 {
        return Err("server closed connection".into());
    }

    Ok(line.trim().to_string())
}

fn print_response(action: &str, response_json: &str, format: &str) {
    if format == "json" {
        println!("{}", response_json);
        return;
    }

    let response: Response = match serde_json::from_str(response_json) {
        Ok(response) => response,
        Err(_) => {
            println!("{} unreadable response: {}", "error:".red().bold(), response_json);
            return;
        }
    };

    match response.status {
        ResponseStatus::Success => {
            println!("{} {}", "OK".green().bold(), action.bright_white());
        }
        ResponseStatus::InvalidAction => {
            let message = response.message.as_deref().unwrap_or("invalid action");
            println!("{} {}", "REJECTED".red().bold(), message.bright_red());
            return;
        }
        ResponseStatus::InvalidRequest | ResponseStatus::Error => {
            let message = response.message.as_deref().unwrap_or("request failed");
            println!("{} {}", "ERROR".red().bold(), message.bright_red());
            return;
        }
    }

    if let Some(step) = &response.step {
        println!("Reward:     {}", format_signed(step.reward));
        println!("Energy:     {:.3}", step.energy);
        println!(
            "Had effect: {}",
            if step.had_effect { "yes".green() } else { "no".yellow() }
        );
        if step.anomaly_detected {
            println!("{}", "ANOMALY DETECTED".bright_red().bold());
            for msg in step.anomaly_messages.lines() {
                println!("  {}", msg.bright_red());
            }
        }
    }

    if let Some(observation) = &response.observation {
        print_observation(observation);
    }
}

fn print_observation(observation: &Observation) {
    println!("{}", "Plant Observation".bright_blue().bold());
    println!("{}", "─────────────────".bright_blue());
    println!("Temperature:     {:.1} °C", observation.temperature);
    println!("Pressure:        {:.1} ATM", observation.pressure);
    println!("Water level:     {:.1} m³", observation.level);
    println!("Reactor power:   {:.1} MW", observation.power);
    println!("Safety rods:     {}", observation.safety_rods);
    println!("Sustain rods:    {}", observation.sustain_rods);
    println!("Fuel rods:       {}", observation.fuel_rods);
    println!("Regulatory rods: {}", observation.regulatory_rods);
}

fn print_actions() {
    println!("{}", "Control Actions".bright_blue().bold());
    println!("{}", "───────────────".bright_blue());
    for action in ActionCode::ALL {
        println!("{:>3}  {}", action.code().to_string().bright_cyan(), action.name());
    }
}

fn format_signed(value: f64) -> ColoredString {
    if value < 0.0 {
        format!("{:.3}", value).bright_red()
    } else {
        format!("{:.3}", value).bright_green()
    }
}
