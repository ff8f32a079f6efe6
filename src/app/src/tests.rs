use super::*;
use crux_core::Request;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use crux_http::HttpError;
use serde_json::{json, Value};

// 2024-05-01T12:00:00+02:00
fn now() -> LocalTimestamp {
    LocalTimestamp::new(1_714_557_600, 2 * 3600)
}

fn mounted_model() -> Model {
    let mut model = Model::default();
    let _ = update::update(Event::Mount, &mut model);
    model
}

fn http_requests(cmd: &mut Command<Effect, Event>) -> Vec<Request<HttpRequest>> {
    cmd.effects()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn single_request(cmd: &mut Command<Effect, Event>) -> Request<HttpRequest> {
    let mut requests = http_requests(cmd);
    assert_eq!(requests.len(), 1, "expected exactly one HTTP request");
    requests.remove(0)
}

fn json_body(request: &Request<HttpRequest>) -> Value {
    serde_json::from_slice(&request.operation.body).unwrap()
}

fn has_json_content_type(request: &Request<HttpRequest>) -> bool {
    request.operation.headers.iter().any(|header| {
        header.name.eq_ignore_ascii_case("content-type") && header.value == "application/json"
    })
}

/// Resolve the request and feed the resulting event back into the model
fn respond(
    cmd: &mut Command<Effect, Event>,
    mut request: Request<HttpRequest>,
    result: HttpResult,
    model: &mut Model,
) {
    request.resolve(result).unwrap();
    let events: Vec<Event> = cmd.events().collect();
    assert_eq!(events.len(), 1, "expected one response event");
    for event in events {
        let _ = update::update(event, model);
    }
}

fn ok_json(body: &str) -> HttpResult {
    HttpResult::Ok(HttpResponse::ok().body(body.as_bytes().to_vec()).build())
}

fn status(code: u16, body: &str) -> HttpResult {
    HttpResult::Ok(HttpResponse::status(code).body(body.as_bytes().to_vec()).build())
}

mod power {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_reads_is_on_from_device() {
        let mut model = mounted_model();

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);

        assert_eq!(request.operation.method, "GET");
        assert_eq!(request.operation.url, "https://relative/toggle");
        assert!(model.is_loading());

        respond(&mut cmd, request, ok_json(r#"{"isOn":true}"#), &mut model);

        assert_eq!(model.power, PowerState::On);
        assert_eq!(model.error_message, None);
        assert!(!model.is_loading());
    }

    #[test]
    fn toggle_error_status_keeps_state_and_alerts() {
        let mut model = Model {
            power: PowerState::On,
            ..mounted_model()
        };

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        respond(&mut cmd, request, status(500, "relay stuck"), &mut model);

        assert_eq!(model.power, PowerState::On);
        assert_eq!(
            model.error_message.as_deref(),
            Some("Error fetching light state")
        );
    }

    #[test]
    fn toggle_malformed_body_alerts() {
        let mut model = mounted_model();

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        respond(&mut cmd, request, ok_json("<html>"), &mut model);

        assert_eq!(model.power, PowerState::Off);
        assert_eq!(
            model.error_message.as_deref(),
            Some("Error fetching light state")
        );
    }

    #[test]
    fn toggle_transport_failure_alerts() {
        let mut model = mounted_model();

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        respond(
            &mut cmd,
            request,
            HttpResult::Err(HttpError::Io("connection refused".to_string())),
            &mut model,
        );

        assert_eq!(model.power, PowerState::Off);
        assert!(model.error_message.is_some());
        assert!(!model.is_loading());
    }

    #[test]
    fn proxied_toggle_uses_api_prefix() {
        let mut model = mounted_model();
        let _ = update::update(
            Event::Configure(PanelConfig {
                api_prefix: Some("/api".to_string()),
                ..Default::default()
            }),
            &mut model,
        );

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);

        assert_eq!(request.operation.url, "https://relative/api/toggle");
    }

    #[test]
    fn response_after_unmount_is_dropped() {
        let mut model = mounted_model();

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        let _ = update::update(Event::Unmount, &mut model);

        respond(&mut cmd, request, ok_json(r#"{"isOn":true}"#), &mut model);

        assert_eq!(model.power, PowerState::Off);
        assert_eq!(model.error_message, None);
        assert_eq!(model.pending_requests, 0);
    }

    #[test]
    fn response_from_before_remount_is_dropped() {
        let mut model = mounted_model();

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        let _ = update::update(Event::Unmount, &mut model);
        let _ = update::update(Event::Mount, &mut model);
        assert!(model.is_mounted());

        respond(&mut cmd, request, ok_json(r#"{"isOn":true}"#), &mut model);

        assert_eq!(model.power, PowerState::Off);
        assert_eq!(model.error_message, None);
        assert!(!model.is_loading());
    }

    #[test]
    fn toggle_after_remount_is_applied() {
        let mut model = mounted_model();
        let _ = update::update(Event::Unmount, &mut model);
        let _ = update::update(Event::Mount, &mut model);

        let mut cmd = update::update(Event::Toggle, &mut model);
        let request = single_request(&mut cmd);
        respond(&mut cmd, request, ok_json(r#"{"isOn":true}"#), &mut model);

        assert_eq!(model.power, PowerState::On);
    }
}

mod wifi {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn submit_posts_credentials_once() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitWifi(WifiCredentials::new("home", "secret")),
            &mut model,
        );
        let request = single_request(&mut cmd);

        assert_eq!(request.operation.method, "POST");
        assert_eq!(request.operation.url, "https://relative/connect");
        assert!(has_json_content_type(&request));
        assert_eq!(
            json_body(&request),
            json!({"ssid": "home", "password": "secret"})
        );

        respond(&mut cmd, request, ok_json(r#"{"status":"ok"}"#), &mut model);

        assert_eq!(model.error_message, None);
        let success = model.success_message.clone().unwrap();
        assert_eq!(success, "Wi-Fi Configuration: SSID=home");
        assert!(!success.contains("secret"));
    }

    #[test]
    fn failure_from_before_remount_raises_no_alert() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitWifi(WifiCredentials::new("home", "secret")),
            &mut model,
        );
        let request = single_request(&mut cmd);
        let _ = update::update(Event::Unmount, &mut model);
        let _ = update::update(Event::Mount, &mut model);

        respond(&mut cmd, request, status(503, ""), &mut model);

        assert_eq!(model.error_message, None);
        assert_eq!(model.success_message, None);
        assert_eq!(model.pending_requests, 0);
    }

    #[test]
    fn failure_alerts_user() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitWifi(WifiCredentials::new("home", "secret")),
            &mut model,
        );
        let request = single_request(&mut cmd);
        respond(&mut cmd, request, status(503, ""), &mut model);

        assert_eq!(
            model.error_message.as_deref(),
            Some("Error connecting to Wi-Fi")
        );
        assert_eq!(model.success_message, None);
    }

    #[test]
    fn empty_ssid_sends_nothing() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitWifi(WifiCredentials::new("", "secret")),
            &mut model,
        );

        assert!(http_requests(&mut cmd).is_empty());
        assert!(model
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Invalid Wi-Fi settings"));
    }

    #[test]
    fn submitting_form_clears_password_buffer() {
        let mut model = mounted_model();
        let _ = update::update(Event::SelectTab(SettingsTab::WiFi), &mut model);
        for (field, value) in [(FormField::Ssid, "home"), (FormField::Password, "secret")] {
            let _ = update::update(
                Event::EditField {
                    field,
                    value: value.to_string(),
                },
                &mut model,
            );
        }

        let mut cmd = update::update(Event::SubmitActiveForm { now: now() }, &mut model);
        let request = single_request(&mut cmd);

        assert_eq!(
            json_body(&request),
            json!({"ssid": "home", "password": "secret"})
        );
        assert!(model.form.password.is_empty());
        assert!(model.form.ssid.is_empty());
    }
}

mod schedule {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_day_schedule_is_twelve_hours_apart() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitSchedule {
                on_time: "08:00".to_string(),
                off_time: "20:00".to_string(),
                now: now(),
            },
            &mut model,
        );
        let request = single_request(&mut cmd);

        assert_eq!(request.operation.url, "https://relative/setup");
        let body = json_body(&request);
        let on_time = body["onTime"].as_i64().unwrap();
        let off_time = body["offTime"].as_i64().unwrap();
        assert_eq!(on_time, 1_714_543_200);
        assert!(on_time < off_time);
        assert_eq!(off_time - on_time, 43_200);

        respond(&mut cmd, request, ok_json("{}"), &mut model);

        assert_eq!(
            model.success_message.as_deref(),
            Some("General Settings: OnTime=1714543200 (Epoch Time), OffTime=1714586400 (Epoch Time)")
        );
    }

    #[test]
    fn failure_alerts_user() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitSchedule {
                on_time: "08:00".to_string(),
                off_time: "20:00".to_string(),
                now: now(),
            },
            &mut model,
        );
        let request = single_request(&mut cmd);
        respond(
            &mut cmd,
            request,
            HttpResult::Err(HttpError::Io("host unreachable".to_string())),
            &mut model,
        );

        assert_eq!(
            model.error_message.as_deref(),
            Some("Error saving general settings")
        );
    }

    #[test]
    fn invalid_time_sends_nothing() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitSchedule {
                on_time: "8 am".to_string(),
                off_time: "20:00".to_string(),
                now: now(),
            },
            &mut model,
        );

        assert!(http_requests(&mut cmd).is_empty());
        assert!(model
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Invalid light on time"));
    }

    #[test]
    fn raw_text_mode_accepts_full_dates() {
        let mut model = mounted_model();
        let _ = update::update(
            Event::Configure(PanelConfig {
                time_input: TimeInputMode::RawText,
                ..Default::default()
            }),
            &mut model,
        );

        let mut cmd = update::update(
            Event::SubmitSchedule {
                on_time: "2024-05-01T08:00".to_string(),
                off_time: "2024-05-02 08:00".to_string(),
                now: now(),
            },
            &mut model,
        );
        let body = json_body(&single_request(&mut cmd));

        assert_eq!(body, json!({"onTime": 1_714_543_200, "offTime": 1_714_629_600}));
    }
}

mod device_clock {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn submit_sends_epoch_and_reports_it() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitDeviceClock {
                current_time: "14:30".to_string(),
                now: now(),
            },
            &mut model,
        );
        let request = single_request(&mut cmd);

        assert_eq!(request.operation.url, "https://relative/setTime");
        assert_eq!(json_body(&request), json!({"currentTime": 1_714_566_600}));

        respond(&mut cmd, request, ok_json(r#"{"ok":true}"#), &mut model);

        assert_eq!(
            model.success_message.as_deref(),
            Some("Set Time: 1714566600 (Epoch Time)")
        );
    }

    #[test]
    fn non_json_ack_alerts_user() {
        let mut model = mounted_model();

        let mut cmd = update::update(
            Event::SubmitDeviceClock {
                current_time: "14:30".to_string(),
                now: now(),
            },
            &mut model,
        );
        let request = single_request(&mut cmd);
        respond(&mut cmd, request, ok_json("done"), &mut model);

        assert_eq!(model.error_message.as_deref(), Some("Error setting time"));
    }
}

mod navigation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn switching_tabs_never_touches_the_device() {
        let mut model = Model {
            power: PowerState::On,
            clock: "9:41 AM".to_string(),
            ..mounted_model()
        };

        for tab in [
            SettingsTab::WiFi,
            SettingsTab::SetTime,
            SettingsTab::General,
        ] {
            let mut cmd = update::update(Event::SelectTab(tab), &mut model);
            assert!(http_requests(&mut cmd).is_empty());
            assert_eq!(model.active_tab, tab);
            assert_eq!(model.power, PowerState::On);
            assert_eq!(model.clock, "9:41 AM");
        }
    }

    #[test]
    fn revisiting_a_tab_resets_its_fields() {
        let mut model = mounted_model();
        let _ = update::update(
            Event::EditField {
                field: FormField::OnTime,
                value: "08:00".to_string(),
            },
            &mut model,
        );

        let _ = update::update(Event::SelectTab(SettingsTab::WiFi), &mut model);
        let _ = update::update(Event::SelectTab(SettingsTab::General), &mut model);

        assert!(model.form.on_time.is_empty());
    }

    #[test]
    fn selecting_active_tab_keeps_fields() {
        let mut model = mounted_model();
        let _ = update::update(
            Event::EditField {
                field: FormField::OnTime,
                value: "08:00".to_string(),
            },
            &mut model,
        );

        let _ = update::update(Event::SelectTab(SettingsTab::General), &mut model);

        assert_eq!(model.form.on_time, "08:00");
    }

    #[test]
    fn edits_outside_active_tab_are_ignored() {
        let mut model = mounted_model();

        let _ = update::update(
            Event::EditField {
                field: FormField::Ssid,
                value: "home".to_string(),
            },
            &mut model,
        );

        assert!(model.form.ssid.is_empty());
    }

    #[test]
    fn clear_error() {
        let mut model = Model {
            error_message: Some("Some error".to_string()),
            ..Default::default()
        };

        let _ = update::update(Event::ClearError, &mut model);

        assert_eq!(model.error_message, None);
    }
}
