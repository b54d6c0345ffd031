use crate::events::AppEvent;
use arcstep::control::{ControlCommand, SOCKET_PATH};
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

fn parse_line(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.parse::<ControlCommand>() {
        Ok(cmd) => Some(AppEvent::Control(cmd)),
        Err(e) => {
            log::warn!("Ignoring control line '{}': {}", line, e);
            None
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_line(&line)
                            && tx.send(event).await.is_err()
                        {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert!(matches!(
            parse_line("left 2\n"),
            Some(AppEvent::Control(ControlCommand::SetDaysLeft(2)))
        ));
        assert!(matches!(
            parse_line("replay"),
            Some(AppEvent::Control(ControlCommand::Replay))
        ));
        assert!(parse_line("   ").is_none());
        assert!(parse_line("show").is_none());
    }
}
