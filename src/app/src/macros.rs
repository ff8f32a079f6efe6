/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.clock, "9:41 AM".to_string())
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.active_tab, SettingsTab::WiFi;
///     model.form, FormState::default()
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for JSON POST requests to the device.
///
/// The body is serialized when the request is built, the device acknowledgment
/// must be valid JSON. On success the acknowledgment is replaced by `map`,
/// which typically hands the submitted values to the response handler. The
/// reply is tagged with the view generation current at send time.
///
/// ```ignore
/// device_post!(model, SETUP_ENDPOINT, ScheduleResponse, "Save schedule",
///     body_json: &payload,
///     map: move |_| payload
/// )
/// ```
#[macro_export]
macro_rules! device_post {
    ($model:expr, $endpoint:expr, $response_event:ident, $action:expr, body_json: $body:expr, map: $mapper:expr) => {{
        match $crate::HttpCmd::post($model.config.endpoint($endpoint))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => {
                $model.start_request();
                let generation = $model.view_generation;
                crux_core::Command::all([
                    crux_core::render::render(),
                    builder.build().then_send(move |result| {
                        let result =
                            $crate::process_json_response::<$crate::DeviceAck>($action, result)
                                .map($mapper);
                        $crate::events::Event::$response_event($crate::events::DeviceReply {
                            generation,
                            result,
                        })
                    }),
                ])
            }
            Err(e) => $crate::handle_request_error($model, $action, e),
        }
    }};
}

/// Macro for handling device responses with the standard alert policy.
///
/// Replies arriving after the view was unmounted, or sent before an earlier
/// unmount, are dropped without touching the model beyond the request counter.
/// Failures are logged in full while the user only sees `error_alert`.
///
/// ```ignore
/// handle_response!(model, reply, {
///     on_success: |model, status| {
///         model.power = PowerState::from(status.is_on);
///     },
///     error_alert: "Error fetching light state",
/// })
/// ```
#[macro_export]
macro_rules! handle_response {
    ($model:expr, $reply:expr, {
        on_success: |$success_model:ident, $value:tt| $success_body:block,
        error_alert: $alert:expr $(,)?
    }) => {{
        let reply: $crate::events::DeviceReply<_> = $reply;
        $model.finish_request();
        if $model.is_unmounted() {
            log::debug!("dropping device response received after unmount");
            crux_core::Command::done()
        } else if reply.generation != $model.view_generation {
            log::debug!(
                "dropping device response from view generation {}",
                reply.generation
            );
            crux_core::Command::done()
        } else {
            match reply.result {
                Ok($value) => {
                    let $success_model = &mut *$model;
                    $success_body
                }
                Err(e) => {
                    log::error!("{e}");
                    $model.set_error($alert.to_string());
                }
            }
            crux_core::render::render()
        }
    }};
}
