use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use env_logger::Env;

use solpay_client::config::ClientConfig;
use solpay_client::request::StreamParameters;
use solpay_client::SolpayClient;

const USAGE: &str = "usage:
    solpay create <recipient> <amount> <duration-seconds>
    solpay withdraw <sender>
    solpay show <sender> <recipient>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Create {
        recipient: String,
        params: StreamParameters,
    },
    Withdraw {
        sender: String,
    },
    Show {
        sender: String,
        recipient: String,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let command = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            ["create", recipient, amount, duration] => Command::Create {
                recipient: recipient.to_string(),
                params: StreamParameters::new(
                    amount.parse().context("amount must be a non-negative integer")?,
                    duration.parse().context("duration must be an integer number of seconds")?,
                ),
            },
            ["withdraw", sender] => Command::Withdraw {
                sender: sender.to_string(),
            },
            ["show", sender, recipient] => Command::Show {
                sender: sender.to_string(),
                recipient: recipient.to_string(),
            },
            _ => bail!(USAGE),
        };
        Ok(command)
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = ClientConfig::from_env()?;
    let client = SolpayClient::connect(config)?;

    match command {
        Command::Create { recipient, params } => {
            let signature = client.create_stream(recipient, params)?;
            println!("Stream created successfully: {signature}");
        }
        Command::Withdraw { sender } => {
            let signature = client.withdraw(sender)?;
            println!("Withdrawal successful: {signature}");
        }
        Command::Show { sender, recipient } => match client.stream_state(&sender, &recipient)? {
            Some(stream) => {
                let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
                println!("{stream:#?}");
                if stream.is_past_end(now) {
                    println!("release period over; the program refuses withdrawals after end_time");
                } else {
                    println!("withdrawable by schedule: {}", stream.withdrawable_amount_at(now));
                }
            }
            None => println!("no stream from {sender} to {recipient}"),
        },
    }

    Ok(())
}
