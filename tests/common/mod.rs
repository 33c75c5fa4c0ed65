#![allow(dead_code)]

pub use chrono_bench_test_utils::{builders, fake_launcher, init_tracing, sh, with_timeout};
