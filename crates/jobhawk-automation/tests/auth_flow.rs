mod common;

use common::*;
use jobhawk_automation::selectors::LOGIN_BUTTON;
use jobhawk_automation::{AuthFailure, AuthOutcome, AuthStage, Authenticator};
use jobhawk_core::{RawSettings, Settings};

#[tokio::test(start_paused = true)]
async fn test_cookie_replay_injects_well_formed_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_session(
        &dir,
        r#"[
            {"name": "li_at", "value": "AQEDAT", "domain": ".www.linkedin.com", "path": "/", "secure": true, "httpOnly": true},
            {"name": "JSESSIONID", "value": "ajax:123"},
            {"name": "lidc"}
        ]"#,
    );
    let settings = cookie_settings(&path);
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(report.outcome, AuthOutcome::Authenticated);
    assert_eq!(report.cookies_injected, 2);
    assert_eq!(report.cookies_rejected, 1);

    let actions = site.actions();
    assert_eq!(actions[0], Action::Navigated(format!("{}/", BASE)));
    assert!(actions.contains(&Action::Refreshed));
    assert!(actions.contains(&Action::Navigated(format!("{}/feed", BASE))));
}

#[tokio::test(start_paused = true)]
async fn test_browser_refusing_a_cookie_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_session(
        &dir,
        r#"[
            {"name": "bad", "value": "x"},
            {"name": "li_at", "value": "AQEDAT"},
            {"name": "lang", "value": "v=2&lang=en-us"}
        ]"#,
    );
    let settings = cookie_settings(&path);
    let site = FakeSite::new().configure(|s| {
        s.refused_cookies.insert("bad".to_string());
    });

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(report.outcome.is_authenticated());
    assert_eq!(report.cookies_injected, 2);
    assert_eq!(report.cookies_rejected, 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_session_file_fails_without_browser_interaction() {
    let dir = tempfile::tempdir().unwrap();
    let settings = cookie_settings(&dir.path().join("nope.json"));
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(matches!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::NoUsableSessionFile,
            ..
        }
    ));
    assert_eq!(report.stage, AuthStage::LoadingFile);
    assert!(site.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_session_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_session(&dir, "{\"name\": ");
    let settings = cookie_settings(&path);
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    match report.outcome {
        AuthOutcome::Failed { reason, detail } => {
            assert_eq!(reason, AuthFailure::NoUsableSessionFile);
            assert!(detail.unwrap().contains("corrupt"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_expired_session_redirects_to_authwall() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_session(&dir, r#"[{"name": "bcookie", "value": "v=2"}]"#);
    let settings = cookie_settings(&path);
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(report.cookies_injected, 1);
    assert_eq!(report.stage, AuthStage::Verifying);
    match report.outcome {
        AuthOutcome::Failed { reason, detail } => {
            assert_eq!(reason, AuthFailure::RedirectedToLogin);
            assert!(detail.unwrap().contains("/authwall"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_credential_login_succeeds_on_navigation_to_feed() {
    let settings = credential_settings();
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(report.outcome, AuthOutcome::Authenticated);
    let actions = site.actions();
    assert!(actions.contains(&Action::Typed("username field", "someone@example.com".to_string())));
    assert!(actions.contains(&Action::Typed("password field", "hunter2".to_string())));
    assert!(actions.contains(&Action::Cleared("username field")));
    assert!(actions.contains(&Action::Clicked("sign-in button")));
}

#[tokio::test(start_paused = true)]
async fn test_credential_login_back_on_login_page_fails_with_error_text() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| {
        s.login_result = LoginResult::Redirect(format!("{}/login?errorKey=invalid", BASE));
        s.login_error = Some("Wrong email or password. Try again.".to_string());
    });

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::StillOnLogin,
            detail: Some("Wrong email or password. Try again.".to_string()),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_credential_login_back_on_login_page_fails_without_error_text() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| {
        s.login_result = LoginResult::Redirect(format!("{}/login?session_redirect=1", BASE));
    });

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::StillOnLogin,
            detail: None,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_security_checkpoint_is_a_failure() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| {
        s.login_result = LoginResult::Redirect(format!("{}/checkpoint/challenge/AgG", BASE));
    });

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(matches!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::StillOnLogin,
            ..
        }
    ));
    assert_eq!(report.stage, AuthStage::AwaitingTransition);
}

#[tokio::test(start_paused = true)]
async fn test_no_navigation_after_submit_times_out() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| s.login_result = LoginResult::Stay);

    let start = tokio::time::Instant::now();
    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(matches!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::NoNavigationAfterSubmit,
            ..
        }
    ));
    assert!(start.elapsed() >= std::time::Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn test_missing_login_form() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| s.login_form = false);

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(matches!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::LoginFormNotFound,
            ..
        }
    ));
    assert_eq!(report.stage, AuthStage::EnteringCredentials);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_sign_in_button_is_not_clicked() {
    let settings = credential_settings();
    let site = FakeSite::new().configure(|s| {
        s.disabled.insert(LOGIN_BUTTON.name);
    });

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert!(matches!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::SubmitNotFound,
            ..
        }
    ));
    assert_eq!(report.stage, AuthStage::Submitting);
    assert!(!site.actions().contains(&Action::Clicked("sign-in button")));
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_method_never_touches_the_browser() {
    let settings = Settings::from_raw(RawSettings {
        auth_method: Some("magic-link".to_string()),
        ..Default::default()
    })
    .unwrap();
    let site = FakeSite::new();

    let report = Authenticator::new(&site, &settings).authenticate().await;

    assert_eq!(
        report.outcome,
        AuthOutcome::Failed {
            reason: AuthFailure::InvalidAuthMethod("magic-link".to_string()),
            detail: None,
        }
    );
    assert_eq!(report.stage, AuthStage::Selecting);
    assert!(site.actions().is_empty());
}
