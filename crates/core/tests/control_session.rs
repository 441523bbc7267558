//! Integration test: drive a Session through a whole control run the way
//! a frontend would — init poll, curve authoring, start, incremental
//! merges (including a duplicated batch from a network retry), the
//! finished transition, a reset performed by another client, and clear.

use ovenpilot_core::{Bounds, ProcessState, Session, SyncOutcome};
use ovenpilot_protocol::{PidParams, ProfilePoint, StatusReply, TemperatureSample};

fn sample(ut: f64, secs: f64, temp: f64, power: f64) -> TemperatureSample {
    TemperatureSample {
        timestamp: ut,
        seconds_since_start: secs,
        current_temp: temp,
        power_fraction: power,
    }
}

fn reply(status: &str, temp: f64, ut: f64, samples: Vec<TemperatureSample>) -> StatusReply {
    StatusReply {
        current_temp: temp,
        current_timestamp: ut,
        process_status: status.into(),
        status_data: samples,
        pid_param: None,
        profile: None,
    }
}

#[test]
fn full_run_from_idle_to_finished_to_clear() {
    let mut session = Session::new();

    // --- first poll: init against an idle backend
    let query = session.next_poll().expect("first poll must be handed out");
    assert!(query.is_init);
    let mut init = reply("not running", 24.8, 1_000.0, vec![]);
    init.pid_param = Some(PidParams::new(10.0, 0.1, 18.0));
    init.profile = Some(vec![]);
    assert_eq!(session.apply_status(&init), SyncOutcome::Applied);

    // anchor pinned at the measured ambient temperature
    assert_eq!(session.profile().points()[0], ProfilePoint::new(0.0, 24.8));
    assert_eq!(session.state(), ProcessState::Idle);

    // --- author a two-segment curve
    assert!(session.add_point(120.0, 150.0));
    assert!(session.add_point(300.0, 180.0));
    assert_eq!(session.profile().len(), 3);

    // --- start the run
    let run = session.request_start().expect("start from idle");
    assert_eq!(run.profile.len(), 3);
    assert_eq!(run.pid_param.map(|p| p.dt), Some(1.0));
    assert_eq!(session.state(), ProcessState::Running);
    assert!(session.editing_locked());
    assert!(!session.add_point(400.0, 200.0));

    // --- two incremental polls; the second repeats the first batch
    // (network retry) and must not duplicate anything
    let batch = vec![
        sample(1_010.0, 0.0, 24.9, 0.0),
        sample(1_012.0, 2.0, 25.6, 0.5),
    ];
    session.next_poll();
    session.apply_status(&reply("running", 25.6, 1_012.0, batch.clone()));
    assert_eq!(session.recorded().len(), 2);

    session.next_poll();
    session.apply_status(&reply("running", 25.6, 1_014.0, batch));
    assert_eq!(session.recorded().len(), 2);
    assert_eq!(session.readouts().power_pct, 50.0);

    // cursor moved past the merged samples
    let query = session.next_poll().expect("poll after merge");
    assert!(!query.is_init);
    assert_eq!(query.min_key, 2);

    // --- the run completes: exactly one closing point
    session.apply_status(&reply("finished", 180.4, 1_310.0, vec![]));
    assert_eq!(session.state(), ProcessState::Finished);
    assert_eq!(session.recorded().len(), 3);
    assert_eq!(
        session.recorded().last(),
        Some(ProfilePoint::new(300.0, 180.4))
    );
    // still locked: terminal states only unlock through clear
    assert!(!session.add_point(400.0, 200.0));

    // --- clear: documented baseline, then an init-style reseed
    session.clear();
    assert_eq!(session.state(), ProcessState::Idle);
    assert!(session.profile().is_empty());
    assert!(session.recorded().is_empty());
    assert_eq!(session.bounds(), Bounds::default());
    assert!(session.next_poll().expect("reseed poll").is_init);
}

#[test]
fn reset_by_another_client_is_detected_and_reseeded() {
    let mut session = Session::new();

    // attach mid-run: the init reply already carries history and a profile
    let mut init = reply(
        "running",
        26.1,
        1_004.0,
        vec![
            sample(1_000.0, 0.0, 25.0, 0.1),
            sample(1_002.0, 2.0, 25.5, 0.2),
            sample(1_004.0, 4.0, 26.1, 0.25),
        ],
    );
    init.pid_param = Some(PidParams::new(10.0, 0.1, 18.0));
    init.profile = Some(vec![
        ProfilePoint::new(0.0, 25.0),
        ProfilePoint::new(300.0, 180.0),
    ]);
    session.next_poll();
    session.apply_status(&init);
    assert_eq!(session.state(), ProcessState::Running);
    assert_eq!(session.recorded().len(), 3);

    // another client cleared the process behind our back
    session.next_poll();
    let outcome = session.apply_status(&reply("not running", 24.0, 1_020.0, vec![]));
    assert_eq!(outcome, SyncOutcome::ResyncRequired);
    assert_eq!(session.state(), ProcessState::Idle);
    assert!(session.recorded().is_empty());

    // the immediate follow-up poll reseeds like a fresh session
    let query = session.next_poll().expect("resync poll");
    assert!(query.is_init);
    let mut fresh = reply("not running", 24.0, 1_022.0, vec![]);
    fresh.pid_param = Some(PidParams::new(10.0, 0.1, 18.0));
    fresh.profile = Some(vec![]);
    session.apply_status(&fresh);
    assert_eq!(session.profile().points(), &[ProfilePoint::new(0.0, 24.0)]);
    assert!(!session.editing_locked());
}

#[test]
fn transport_failure_leaves_state_untouched() {
    let mut session = Session::new();
    session.next_poll();
    let mut init = reply("not running", 25.0, 1_000.0, vec![]);
    init.profile = Some(vec![]);
    session.apply_status(&init);
    session.add_point(120.0, 150.0);
    let before_len = session.profile().len();
    let before_bounds = session.bounds();

    session.next_poll();
    session.poll_failed("connection reset by peer");

    assert_eq!(session.profile().len(), before_len);
    assert_eq!(session.bounds(), before_bounds);
    assert_eq!(session.state(), ProcessState::Idle);
    assert!(session.notice().is_some());
    // the next tick retries
    assert!(session.next_poll().is_some());
}
