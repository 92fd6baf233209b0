pub mod counter_seed;
