//! End-to-end logger behavior against the in-memory sink.

use serde_json::json;
use yeko_logger::format::{console_formatter, json_formatter};
use yeko_logger::{ErrorInfo, LogContext, LogLevel, LoggerConfig, UserRole};

mod common;

#[test]
fn test_memory_scenario_info_recorded_debug_dropped() {
    let (factory, memory) = common::memory_factory_at(LogLevel::Info);
    let logger = factory.create(["app"], None);

    logger.info(
        "hello",
        Some(LogContext {
            school_id: Some("s1".into()),
            ..LogContext::default()
        }),
    );
    logger.debug("noise", None);

    let records = memory.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, LogLevel::Info);
    assert_eq!(record.message, "hello");
    assert_eq!(record.category, vec!["app"]);

    let context = record.context.as_ref().unwrap();
    assert_eq!(context.school_id.as_deref(), Some("s1"));
    assert_eq!(context.extra("service"), Some(&json!("yeko")));
    assert_eq!(context.extra("environment"), Some(&json!("test")));
}

#[test]
fn test_fatal_and_error_reach_sink_identically() {
    let (factory, memory) = common::memory_factory();
    let logger = factory.create(["app"], None);

    logger.error("db down", Some(ErrorInfo::new("DbError", "refused")), None);
    logger.fatal("db down", Some(ErrorInfo::new("DbError", "refused")), None);

    let records = memory.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, records[1].level);
    assert_eq!(records[0].level, LogLevel::Error);
    assert_eq!(records[0].message, records[1].message);
    assert_eq!(records[0].error, records[1].error);
    assert_eq!(records[0].context, records[1].context);
}

#[test]
fn test_child_categories_compose() {
    let (factory, memory) = common::memory_factory();
    let root = factory.create(["app"], None);
    let child = root.child(["x"]).child(["y"]);

    child.info("from child", None);
    root.info("from root", None);

    let records = memory.records();
    assert_eq!(records[0].category, vec!["app", "x", "y"]);
    assert_eq!(records[0].category_path(), "app.x.y");
    assert_eq!(records[1].category, vec!["app"]);
}

#[test]
fn test_with_user_leaves_parent_untouched() {
    let (factory, memory) = common::memory_factory();
    let a = factory.create(["app"], None);
    let b = a.with_user("u1", UserRole::Teacher);

    a.info("from a", None);
    b.info("from b", None);

    let records = memory.records();
    let from_a = records[0].context.as_ref().unwrap();
    assert!(from_a.user_id.is_none());
    assert!(from_a.user_role.is_none());

    let from_b = records[1].context.as_ref().unwrap();
    assert_eq!(from_b.user_id.as_deref(), Some("u1"));
    assert_eq!(from_b.user_role, Some(UserRole::Teacher));
}

#[test]
fn test_chained_context_and_masking() {
    let (factory, memory) = common::memory_factory();
    let logger = factory
        .create(["api"], None)
        .with_school("s1")
        .with_academic_context("ay-2024", Some("sem-1".into()));

    logger.warning(
        "slow request",
        Some(LogContext {
            ip: Some("198.51.100.23".into()),
            user_agent: Some(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/119.0.0.0 Safari/537.36"
                    .into(),
            ),
            duration: Some(1250),
            ..LogContext::default()
        }),
    );

    let record = &memory.records()[0];
    let context = record.context.as_ref().unwrap();
    assert_eq!(context.school_id.as_deref(), Some("s1"));
    assert_eq!(context.academic_year_id.as_deref(), Some("ay-2024"));
    assert_eq!(context.ip.as_deref(), Some("198.51.xxx.xxx"));
    assert_eq!(context.user_agent.as_deref(), Some("Chrome/119"));

    let line = console_formatter(record);
    assert!(line.contains("WARNING"));
    assert!(line.contains("school:s1"));
    assert!(line.contains("duration:1250ms"));
    assert!(line.contains("year:ay-2024"));

    let json = json_formatter(record);
    assert_eq!(json["level"], "warning");
    assert_eq!(json["category"], "api");
    assert_eq!(json["context"]["semesterId"], "sem-1");
}

#[test]
fn test_metadata_is_lifted_out_of_context() {
    let (factory, memory) = common::memory_factory();
    let logger = factory.create(["reports"], None);

    logger.info(
        "report generated",
        Some(LogContext::new().with_metadata("pages", 12)),
    );

    let record = &memory.records()[0];
    assert_eq!(
        record.metadata.as_ref().and_then(|m| m.get("pages")),
        Some(&json!(12))
    );
    assert!(record.context.as_ref().and_then(|c| c.metadata.as_ref()).is_none());
}

#[test]
fn test_empty_context_is_normalized_away() {
    let (factory, memory) = common::memory_factory_with(LoggerConfig {
        default_context: None,
        ..yeko_logger::config::presets::test_config()
    });
    let logger = factory.create(["app"], None);

    logger.info(
        "bare",
        Some(LogContext {
            school_id: Some(String::new()),
            ..LogContext::default()
        }),
    );

    assert!(memory.records()[0].context.is_none());
}

#[test]
fn test_error_info_from_std_error() {
    let (factory, memory) = common::memory_factory();
    let logger = factory.create(["files"], None);

    let failure = std::fs::read_to_string("/nonexistent/yeko/report.csv").unwrap_err();
    logger.error("import failed", Some(ErrorInfo::from_error(&failure)), None);

    let error = memory.records()[0].error.clone().unwrap();
    assert_eq!(error.name, "Error");
    assert_eq!(error.message, failure.to_string());
}

#[test]
fn test_conflicting_or_mistyped_extras_keep_the_context() {
    let (factory, memory) = common::memory_factory();
    let logger = factory.create(["grades"], None).with_school("s1");

    logger.info(
        "school switched",
        Some(LogContext::new().with_extra("schoolId", "s2")),
    );
    logger.info(
        "slow import",
        Some(LogContext::new().with_extra("duration", "fast")),
    );

    let records = memory.records();
    assert_eq!(common::messages(&records), vec!["school switched", "slow import"]);

    let switched = records[0].context.as_ref().unwrap();
    assert_eq!(switched.school_id.as_deref(), Some("s2"));

    let slow = records[1].context.as_ref().unwrap();
    assert_eq!(slow.school_id.as_deref(), Some("s1"));
    assert!(slow.duration.is_none());
    assert_eq!(slow.extra("duration"), Some(&json!("fast")));
    assert_eq!(slow.extra("service"), Some(&json!("yeko")));
}
