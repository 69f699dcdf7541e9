/// Emit a `SystemEvent` with a fresh correlation id.
///
/// ```ignore
/// emit_system_event!(LogLevel::Info, "config_loaded", Some(path.to_string()));
/// ```
#[macro_export]
macro_rules! emit_system_event {
    ($level:expr, $action:expr, $detail:expr) => {{
        let mut meta = $crate::events::dispatcher::meta("system", $level);
        meta.corr_id = Some($crate::events::dispatcher::correlation_id());
        $crate::events::dispatcher::emit($crate::events::model::LogEvent::System(
            $crate::events::model::SystemEvent {
                meta,
                action: $action.to_string(),
                detail: $detail,
            },
        ));
    }};
}

/// Emit a `NodeEvent` describing a learning loop transition.
///
/// The `quiet` form keeps the event out of the console sink (file sinks still
/// receive it).
#[macro_export]
macro_rules! emit_node_event {
    (@emit $meta:ident, $action:expr, $teacher:expr, $detail:expr) => {
        $crate::events::dispatcher::emit($crate::events::model::LogEvent::Node(
            $crate::events::model::NodeEvent {
                meta: $meta,
                action: $action.to_string(),
                teacher: $teacher,
                detail: $detail,
            },
        ))
    };
    (quiet $level:expr, $action:expr, $teacher:expr, $detail:expr) => {{
        let mut meta = $crate::events::dispatcher::meta("node", $level);
        meta.suppress_console = true;
        $crate::emit_node_event!(@emit meta, $action, $teacher, $detail);
    }};
    ($level:expr, $action:expr, $teacher:expr, $detail:expr) => {{
        let meta = $crate::events::dispatcher::meta("node", $level);
        $crate::emit_node_event!(@emit meta, $action, $teacher, $detail);
    }};
}
