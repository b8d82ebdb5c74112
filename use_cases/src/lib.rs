pub mod assemble_daily_snapshot;
pub mod import_daily_snapshots;
pub mod resolve_target_dates;
