use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use gridarb::event::AppEvent;
use gridarb::feed::controller::FeedController;
use gridarb::feed::StreamMode;
use gridarb::sim::dataset::{Dataset, GridRow, TrafficRow, WeatherRow};
use gridarb::sim::server::{build_router, SimState};

fn long_dataset() -> Dataset {
    let mut grid = Vec::new();
    let mut weather = Vec::new();
    let mut traffic = Vec::new();
    for i in 0..600 {
        let ts = format!("2024-01-01T00:{:02}:{:02}Z", (i / 60) % 60, i % 60);
        grid.push(GridRow {
            timestamp: ts.clone(),
            spot_price: 40.0 + (i % 7) as f64,
            grid_load_mw: 700.0,
        });
        weather.push(WeatherRow {
            timestamp: ts.clone(),
            temp_c: 20.0,
        });
        traffic.push(TrafficRow {
            timestamp: ts,
            congestion_index: 50.0,
        });
    }
    Dataset {
        grid,
        weather,
        traffic,
    }
}

async fn spawn_sim_server() -> String {
    let state = Arc::new(SimState::new(long_dataset(), Duration::from_millis(5)));
    let router = build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("ws://{}/ws/stream", addr)
}

fn route(feed: &mut FeedController, event: AppEvent) {
    match event {
        AppEvent::FeedTick { generation, tick } => {
            feed.on_tick(generation, tick);
        }
        AppEvent::FeedStatus { generation, status } => {
            feed.on_status(generation, status);
        }
        _ => {}
    }
}

async fn drain_until(
    feed: &mut FeedController,
    rx: &mut mpsc::Receiver<AppEvent>,
    mut done: impl FnMut(&FeedController) -> bool,
) {
    while !done(feed) {
        match tokio::time::timeout(Duration::from_secs(10), rx.recv()).await {
            Ok(Some(event)) => route(feed, event),
            Ok(None) => panic!("event channel closed unexpectedly"),
            Err(_) => panic!("timed out waiting for stream events"),
        }
    }
}

#[tokio::test]
async fn switching_modes_never_mixes_ticks() {
    let url = spawn_sim_server().await;

    let (tx, mut rx) = mpsc::channel(256);
    let mut feed = FeedController::new(&url, StreamMode::Sim, tx);
    feed.start();

    // Let a few sim ticks accumulate.
    drain_until(&mut feed, &mut rx, |f| f.buffer().len() >= 3).await;
    assert!(feed.buffer().iter().all(|t| t.mode.is_none()));

    // Switch mid-stream. The window must come back empty and only ever fill
    // with live-tagged ticks, no matter what the old subscription still had
    // in flight.
    assert!(feed.set_mode(StreamMode::Live));
    assert!(feed.buffer().is_empty());

    drain_until(&mut feed, &mut rx, |f| f.buffer().len() >= 3).await;
    assert!(feed
        .buffer()
        .iter()
        .all(|t| t.mode.as_deref() == Some("live")));
}

#[tokio::test]
async fn immediate_double_switch_lands_on_final_mode() {
    let url = spawn_sim_server().await;

    let (tx, mut rx) = mpsc::channel(256);
    let mut feed = FeedController::new(&url, StreamMode::Sim, tx);
    feed.start();

    // Flip to live and straight back to sim before any live tick is applied.
    feed.set_mode(StreamMode::Live);
    feed.set_mode(StreamMode::Sim);
    assert_eq!(feed.mode(), StreamMode::Sim);

    drain_until(&mut feed, &mut rx, |f| f.buffer().len() >= 3).await;
    assert!(feed.buffer().iter().all(|t| t.mode.is_none()));
}
