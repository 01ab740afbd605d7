pub mod day_dial;
