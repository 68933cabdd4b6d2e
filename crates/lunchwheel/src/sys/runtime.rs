use crate::config::PlacesConfig;
use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::{Handle, Runtime};

/// Handle to the background tokio runtime that owns the socket server,
/// the config watcher and places searches.
#[derive(Clone)]
pub struct Services {
    handle: Handle,
    tx: Sender<AppEvent>,
}

impl Services {
    pub fn start(tx: Sender<AppEvent>) -> std::io::Result<Self> {
        let rt = Runtime::new()?;
        let handle = rt.handle().clone();

        {
            let tx = tx.clone();
            thread::spawn(move || {
                rt.block_on(async {
                    {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            crate::sys::server::run_server(tx).await;
                        });
                    }

                    {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            crate::config::run_async_watcher(tx).await;
                        });
                    }

                    std::future::pending::<()>().await;
                });
            });
        }

        Ok(Self { handle, tx })
    }

    pub fn load_places(&self, cfg: PlacesConfig, generation: u64) {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            crate::sys::places::load_places(cfg, generation, tx).await;
        });
    }
}
