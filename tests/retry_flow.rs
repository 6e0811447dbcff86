use jobhunter_payments::gateways::{GatewayAck, GatewayError};
use jobhunter_payments::service::retry_orchestrator::{
    attempt_limit, backoff_for, classify_attempt_result, RetryDirective, RetryPolicy,
};
use std::time::Duration;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_backoff_ms: 200,
        max_backoff_ms: 2_000,
    }
}

#[test]
fn retryable_failure_continues_with_backoff() {
    let result = Err(GatewayError::Http {
        status: 502,
        body: String::new(),
    });
    assert_eq!(
        classify_attempt_result(&result, 1, &policy()),
        RetryDirective::RetryAfter(Duration::from_millis(200))
    );
    assert_eq!(
        classify_attempt_result(&result, 2, &policy()),
        RetryDirective::RetryAfter(Duration::from_millis(400))
    );
}

#[test]
fn last_attempt_gives_up() {
    let result = Err(GatewayError::Transport("refused".to_string()));
    assert_eq!(
        classify_attempt_result(&result, 3, &policy()),
        RetryDirective::GiveUp
    );
}

#[test]
fn replies_are_final() {
    let accepted = Ok(GatewayAck::Accepted {
        pay_url: "https://pay".to_string(),
    });
    let declined = Ok(GatewayAck::Declined {
        result_code: 1001,
        message: "insufficient balance".to_string(),
    });
    assert_eq!(classify_attempt_result(&accepted, 1, &policy()), RetryDirective::Done);
    assert_eq!(classify_attempt_result(&declined, 1, &policy()), RetryDirective::Done);
}

#[test]
fn ambiguous_failures_are_not_resent() {
    for err in [
        GatewayError::Timeout,
        GatewayError::Interrupted("reset".to_string()),
        GatewayError::Malformed("eof".to_string()),
        GatewayError::Http {
            status: 429,
            body: String::new(),
        },
    ] {
        assert_eq!(
            classify_attempt_result(&Err(err), 1, &policy()),
            RetryDirective::GiveUp
        );
    }
}

#[test]
fn backoff_doubles_up_to_cap() {
    let p = policy();
    let delays: Vec<u128> = (1..=6).map(|a| backoff_for(&p, a).as_millis()).collect();
    assert_eq!(delays, vec![200, 400, 800, 1600, 2000, 2000]);
    assert_eq!(backoff_for(&p, 40).as_millis(), 2000);
}

#[test]
fn attempt_limit_is_at_least_one() {
    let p = RetryPolicy {
        max_attempts: 0,
        ..policy()
    };
    assert_eq!(attempt_limit(&p), 1);
    assert_eq!(
        classify_attempt_result(&Err(GatewayError::Transport("x".to_string())), 1, &p),
        RetryDirective::GiveUp
    );
}
