//! Declarative scheduling: static cron and trigger tables that originate
//! actions on a timer or on an external event.

pub mod cron;
pub mod table;
pub mod triggers;

pub use self::cron::CronScheduler;
pub use self::table::{CronEntry, TriggerEntry, load_cron_table, load_trigger_table};
pub use self::triggers::TriggerRegistry;
