pub mod clock_task;
pub mod gps_task;
pub mod host_tx_task;
pub mod race_task;
