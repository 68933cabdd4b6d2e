use crate::events::AppEvent;
use async_channel::Sender;
use nearby::daemon::{DaemonCommand, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixListener;

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

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    handle_connection(stream, tx).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_connection<R: AsyncRead + Unpin>(stream: R, tx: Sender<AppEvent>) {
    let mut lines = BufReader::new(stream).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<DaemonCommand>() {
            Ok(command) => {
                log::debug!("Socket command: {}", command);
                if tx.send(AppEvent::from(command)).await.is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("Ignoring socket command '{}': {}", line.trim(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_forwards_valid_commands() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"show\n\nbogus\nadd Green Curry\nremove 2\n";

        handle_connection(input, tx).await;

        let events: Vec<AppEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], AppEvent::Show));
        assert!(matches!(&events[1], AppEvent::AddItem(label) if label == "Green Curry"));
        assert!(matches!(events[2], AppEvent::RemoveItem(2)));
    }
}
