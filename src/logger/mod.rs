//! Loggers and the factory that hands them out.
//!
//! # Data Flow
//! ```text
//! LoggerFactory::create(category, overrides)
//!     → YekoLogger (category path, resolved config, base context)
//!     → leveled call: default context ⊕ logger context ⊕ call context
//!     → normalize → mask
//!     → engine (see crate::engine)
//! ```
//!
//! # Design Decisions
//! - Loggers are immutable values; chaining returns new loggers
//! - Loggers resolve the engine at call time, so one created before
//!   configuration starts writing as soon as configuration lands

pub mod core;
pub mod factory;

pub use self::core::YekoLogger;
pub use self::factory::LoggerFactory;
