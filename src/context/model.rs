//! Log context schema and pure context transformations.
//!
//! A `LogContext` carries the correlation data attached to a record: tenant,
//! actor, academic scope, request and performance figures, plus arbitrary
//! extension fields. Every function here is side-effect free and total.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of the actor a record is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Parent,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
            UserRole::Parent => "parent",
            UserRole::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured correlation data attached to a log record.
///
/// Well-known fields are typed; anything else lives in `extra` and is
/// flattened next to them when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogContext {
    // Tenant scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    // Actor scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    // Academic scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    // Request scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Elapsed time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Memory usage in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<u64>,

    /// Nested metadata, merged key-wise when contexts combine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Extension fields (e.g. `logType`, `runtime`, `statusCode`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an extension field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Set a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Decode a context from a JSON object, keeping every readable field.
    ///
    /// A value that does not fit its typed field (a string `duration`, an
    /// unknown `userRole`) is kept as an extension field under the same key
    /// instead of failing the whole context.
    pub fn from_json_map(map: Map<String, Value>) -> LogContext {
        if let Ok(context) = serde_json::from_value(Value::Object(map.clone())) {
            return context;
        }

        let mut context = LogContext::default();
        for (key, value) in map {
            let mut single = Map::new();
            single.insert(key.clone(), value.clone());
            match serde_json::from_value::<LogContext>(Value::Object(single)) {
                Ok(field) => context = context.overlay(&field),
                Err(_) => {
                    context.extra.insert(key, value);
                }
            }
        }
        context
    }

    /// Read an extension field.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// True when no field at all is set.
    pub fn is_empty(&self) -> bool {
        self.school_id.is_none()
            && self.organization_id.is_none()
            && self.user_id.is_none()
            && self.user_role.is_none()
            && self.session_id.is_none()
            && self.academic_year_id.is_none()
            && self.semester_id.is_none()
            && self.course_id.is_none()
            && self.subject_id.is_none()
            && self.request_id.is_none()
            && self.ip.is_none()
            && self.user_agent.is_none()
            && self.duration.is_none()
            && self.memory_usage.is_none()
            && self.metadata.is_none()
            && self.extra.is_empty()
    }

    /// Overlay `other` onto `self`: set fields of `other` win, metadata is
    /// merged one level deep.
    pub fn overlay(&self, other: &LogContext) -> LogContext {
        let metadata = match (&self.metadata, &other.metadata) {
            (Some(base), Some(additional)) => {
                let mut merged = base.clone();
                for (key, value) in additional {
                    merged.insert(key.clone(), value.clone());
                }
                Some(merged)
            }
            (base, additional) => additional.clone().or_else(|| base.clone()),
        };

        let mut extra = self.extra.clone();
        for (key, value) in &other.extra {
            extra.insert(key.clone(), value.clone());
        }

        LogContext {
            school_id: pick(&self.school_id, &other.school_id),
            organization_id: pick(&self.organization_id, &other.organization_id),
            user_id: pick(&self.user_id, &other.user_id),
            user_role: other.user_role.or(self.user_role),
            session_id: pick(&self.session_id, &other.session_id),
            academic_year_id: pick(&self.academic_year_id, &other.academic_year_id),
            semester_id: pick(&self.semester_id, &other.semester_id),
            course_id: pick(&self.course_id, &other.course_id),
            subject_id: pick(&self.subject_id, &other.subject_id),
            request_id: pick(&self.request_id, &other.request_id),
            ip: pick(&self.ip, &other.ip),
            user_agent: pick(&self.user_agent, &other.user_agent),
            duration: other.duration.or(self.duration),
            memory_usage: other.memory_usage.or(self.memory_usage),
            metadata,
            extra,
        }
    }
}

fn pick(base: &Option<String>, additional: &Option<String>) -> Option<String> {
    additional.clone().or_else(|| base.clone())
}

/// Combine two optional contexts, right-biased.
///
/// Returns `None` only when both inputs are `None`.
pub fn merge_context(
    base: Option<&LogContext>,
    additional: Option<&LogContext>,
) -> Option<LogContext> {
    match (base, additional) {
        (None, None) => None,
        (Some(base), None) => Some(base.clone()),
        (None, Some(additional)) => Some(additional.clone()),
        (Some(base), Some(additional)) => Some(base.overlay(additional)),
    }
}

pub fn create_user_context(
    user_id: impl Into<String>,
    role: UserRole,
    additional: Option<&LogContext>,
) -> LogContext {
    let user = LogContext {
        user_id: Some(user_id.into()),
        user_role: Some(role),
        ..LogContext::default()
    };
    match additional {
        Some(additional) => additional.overlay(&user),
        None => user,
    }
}

pub fn create_school_context(
    school_id: impl Into<String>,
    organization_id: Option<String>,
) -> LogContext {
    LogContext {
        school_id: Some(school_id.into()),
        organization_id,
        ..LogContext::default()
    }
}

pub fn create_academic_context(
    academic_year_id: impl Into<String>,
    semester_id: Option<String>,
    course_id: Option<String>,
    subject_id: Option<String>,
) -> LogContext {
    LogContext {
        academic_year_id: Some(academic_year_id.into()),
        semester_id,
        course_id,
        subject_id,
        ..LogContext::default()
    }
}

pub fn create_request_context(
    request_id: impl Into<String>,
    ip: Option<String>,
    user_agent: Option<String>,
) -> LogContext {
    LogContext {
        request_id: Some(request_id.into()),
        ip,
        user_agent,
        ..LogContext::default()
    }
}

pub fn create_performance_context(duration: u64, memory_usage: Option<u64>) -> LogContext {
    LogContext {
        duration: Some(duration),
        memory_usage,
        ..LogContext::default()
    }
}

/// Strip empty decoration from a context.
///
/// Empty strings, zero `duration`/`memoryUsage`, empty metadata and `null`
/// extension values are dropped.
/// Returns `None` when nothing is left, so sinks never see an empty object.
pub fn normalize_context(context: Option<&LogContext>) -> Option<LogContext> {
    let context = context?;

    let normalized = LogContext {
        school_id: non_empty(&context.school_id),
        organization_id: non_empty(&context.organization_id),
        user_id: non_empty(&context.user_id),
        user_role: context.user_role,
        session_id: non_empty(&context.session_id),
        academic_year_id: non_empty(&context.academic_year_id),
        semester_id: non_empty(&context.semester_id),
        course_id: non_empty(&context.course_id),
        subject_id: non_empty(&context.subject_id),
        request_id: non_empty(&context.request_id),
        ip: non_empty(&context.ip),
        user_agent: non_empty(&context.user_agent),
        duration: context.duration.filter(|d| *d != 0),
        memory_usage: context.memory_usage.filter(|m| *m != 0),
        metadata: context.metadata.clone().filter(|m| !m.is_empty()),
        extra: context
            .extra
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    };

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
