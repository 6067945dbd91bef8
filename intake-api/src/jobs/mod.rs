pub mod intake_manager;
