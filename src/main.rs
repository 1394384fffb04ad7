use std::sync::Arc;

use stream_odds::clock::SystemClock;
use stream_odds::config::Config;
use stream_odds::events::NoData;
use stream_odds::popup::{Popup, PopupView};
use stream_odds::render::TEAM_TEMPLATE;
use stream_odds::session::WsPort;
use stream_odds::store::FileStore;

fn print_view(view: &PopupView) {
    match view {
        PopupView::Event(event) => {
            if !event.title.is_empty() {
                println!("{}", event.title);
            }
            for row in event.team_rows(TEAM_TEMPLATE) {
                println!("{}", row);
            }
            println!("{}", event.link);
        }
        PopupView::NoData(NoData::UnparseableUrl) => {
            println!("No data: not a twitch channel");
        }
        PopupView::NoData(NoData::NoMatch { channel }) => {
            println!("No data: no open event for {}", channel);
        }
        PopupView::Notice(message) => {
            eprintln!("Could not load events: {}", message);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("STREAM_ODDS_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load_or_default(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.general.log_level)),
        )
        .init();

    // Active tab URL
    let tab_url = std::env::args().nth(1);

    let store = Arc::new(FileStore::new(&cfg.cache.dir));
    let popup = Popup::new(&cfg, store, Arc::new(SystemClock));
    let port = WsPort::new(cfg.handshake.bridge_url.clone());

    popup.open(tab_url.as_deref(), port, print_view).await;

    Ok(())
}
