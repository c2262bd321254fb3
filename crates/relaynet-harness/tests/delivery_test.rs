//! End-to-end delivery scenarios.
//!
//! Each test runs the full six-actor network to idle in virtual time and
//! checks the final world with oracles.

use std::{cell::RefCell, rc::Rc, time::Duration};

use relaynet_core::{LossModel, NetworkSnapshot};
use relaynet_harness::scenario::{Scenario, oracle};

#[test]
fn default_network_sends_every_frame_and_goes_idle() {
    let result = Scenario::new("default network")
        .seed(42)
        .oracle(oracle::all_of(vec![
            oracle::consistent(),
            oracle::every_link_reached_target(),
            oracle::custom(|world| {
                // 2 producers x 2 destinations x 1000 frames
                assert_eq!(world.report().total_sent, 4000);
                assert_eq!(world.report().links.len(), 4);

                // 2000 sends per producer at one per 200ms
                assert!(world.elapsed() >= Duration::from_secs(400), "{:?}", world.elapsed());

                let transport = world.transport();
                assert_eq!(transport.producer_drops, 0, "central channel never fills");
                assert!(transport.injected_drops > 0, "1% loss over 4000 frames");
                Ok(())
            }),
        ]))
        .run();

    assert!(result.is_ok(), "scenario should succeed: {result:?}");
}

#[test]
fn lossless_network_delivers_in_order() {
    let result = Scenario::new("lossless")
        .frames(50)
        .loss(LossModel::None)
        .oracle(oracle::all_of(vec![
            oracle::consistent(),
            oracle::every_link_reached_target(),
            oracle::lossless(),
            oracle::custom(|world| {
                for (source, destination) in [(1, 3), (1, 4), (2, 3), (2, 4)] {
                    assert_eq!(world.link(source, destination).expected, 50);
                }
                assert_eq!(world.transport().forwarded, 200);
                Ok(())
            }),
        ]))
        .run();

    assert!(result.is_ok(), "scenario should succeed: {result:?}");
}

#[test]
fn final_report_percentages_round_down() {
    let result = Scenario::new("percentages")
        .frames(3)
        .drop_frame(1, 3, 0)
        .oracle(Box::new(|world| {
            let report = world.report();
            assert_eq!(report.total_sent, 12);
            assert_eq!(report.total_received, 11);
            // 11 / 12 = 91.6%
            assert_eq!(report.received_percent(), 91);
            assert_eq!(report.lost_percent(), 8);
            Ok(())
        }))
        .run();

    assert!(result.is_ok(), "scenario should succeed: {result:?}");
}

#[test]
fn same_seed_reproduces_the_run() {
    let runs: Rc<RefCell<Vec<NetworkSnapshot>>> = Rc::default();

    for _ in 0..2 {
        let sink = runs.clone();
        let result = Scenario::new("replay")
            .seed(7)
            .frames(40)
            .loss(LossModel::Rate(0.1))
            .oracle(Box::new(move |world| {
                sink.borrow_mut().push(world.snapshot().clone());
                Ok(())
            }))
            .run();
        assert!(result.is_ok(), "scenario should succeed: {result:?}");
    }

    let runs = runs.borrow();
    assert_eq!(runs[0], runs[1]);
    assert!(runs[0].transport.injected_drops > 0);
}

#[test]
fn failing_oracle_fails_the_scenario() {
    let result = Scenario::new("strict")
        .frames(2)
        .drop_frame(1, 3, 0)
        .oracle(oracle::lossless())
        .run();

    let err = result.unwrap_err();
    assert!(err.contains("strict"), "{err}");
}
