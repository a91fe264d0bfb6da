use gridarb::feed::buffer::{TickBuffer, WINDOW_TICKS};
use gridarb::model::tick::{Signal, Tick};

fn make_tick(seq: usize, pnl: f64) -> Tick {
    Tick {
        timestamp: format!("2024-01-01T00:{:02}:{:02}Z", seq / 60, seq % 60),
        spot_price: 40.0 + seq as f64 * 0.01,
        forecast_price: 40.0,
        signal: Signal::Hold,
        inventory_mwh: 0.0,
        cash: 100_000.0,
        pnl,
        grid_load_mw: 700.0,
        traffic_index: 50.0,
        temp_c: 10.0,
        target_inventory_mwh: None,
        target_physical_mwh: None,
        target_contract_mwh: None,
        physical_share: None,
        forward_price: None,
        baseline_spot: None,
        mode: None,
    }
}

#[test]
fn append_keeps_insertion_order() {
    let mut buffer = TickBuffer::default();
    for (seq, pnl) in [1.0, -2.0, 3.5].into_iter().enumerate() {
        buffer.append(make_tick(seq, pnl));
    }
    assert_eq!(buffer.len(), 3);
    assert!((buffer.latest().unwrap().pnl - 3.5).abs() < f64::EPSILON);

    let pnls: Vec<f64> = buffer.iter().map(|t| t.pnl).collect();
    assert_eq!(pnls, vec![1.0, -2.0, 3.5]);
}

#[test]
fn sliding_window_holds_last_180() {
    let mut buffer = TickBuffer::default();
    for seq in 0..500 {
        buffer.append(make_tick(seq, seq as f64));
        assert!(buffer.len() <= WINDOW_TICKS);
    }
    assert_eq!(buffer.len(), WINDOW_TICKS);

    // Contents are exactly the last 180 ticks in arrival order.
    let pnls: Vec<f64> = buffer.iter().map(|t| t.pnl).collect();
    let expected: Vec<f64> = (320..500).map(|seq| seq as f64).collect();
    assert_eq!(pnls, expected);
}

#[test]
fn eviction_drops_oldest_first() {
    let mut buffer = TickBuffer::default();
    for seq in 0..200 {
        buffer.append(make_tick(seq, 0.0));
    }
    assert_eq!(buffer.len(), 180);

    // Ticks 0..19 were evicted; the window starts at the 21st tick.
    let first = buffer.iter().next().unwrap();
    assert_eq!(first.timestamp, make_tick(20, 0.0).timestamp);
    let last = buffer.latest().unwrap();
    assert_eq!(last.timestamp, make_tick(199, 0.0).timestamp);
}

#[test]
fn clear_empties_the_window() {
    let mut buffer = TickBuffer::default();
    for seq in 0..10 {
        buffer.append(make_tick(seq, 0.0));
    }
    buffer.clear();
    assert!(buffer.is_empty());
    assert!(buffer.latest().is_none());
    assert_eq!(buffer.iter().count(), 0);

    // The window stays usable after a clear.
    buffer.append(make_tick(99, 7.0));
    assert_eq!(buffer.len(), 1);
    assert!((buffer.latest().unwrap().pnl - 7.0).abs() < f64::EPSILON);
}

#[test]
fn small_capacity_evicts_correctly() {
    let mut buffer = TickBuffer::new(3);
    for seq in 0..5 {
        buffer.append(make_tick(seq, seq as f64));
    }
    assert_eq!(buffer.capacity(), 3);
    let pnls: Vec<f64> = buffer.iter().map(|t| t.pnl).collect();
    assert_eq!(pnls, vec![2.0, 3.0, 4.0]);
}
