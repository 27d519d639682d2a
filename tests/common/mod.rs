#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use template_machine::context::{Context, ContextOptions};
use template_machine::machine::TemplateMachine;
use template_machine::renderer::MiniJinjaRenderer;
use template_machine::stats::RunStats;

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write<P: AsRef<Path>>(root: P, relative: &str, content: &str) -> PathBuf {
    let path = root.as_ref().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn read<P: AsRef<Path>>(path: P) -> String {
    fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.as_ref().display()))
}

/// Fixed timestamp so generated output is reproducible.
pub fn run_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 11, 30).unwrap().and_hms_opt(14, 7, 9).unwrap()
}

pub fn options<S: AsRef<Path>, O: AsRef<Path>>(source: S, output: O) -> ContextOptions {
    ContextOptions::new(source.as_ref(), output.as_ref()).generation_time(run_time())
}

/// Runs a full generation and returns its statistics.
pub fn generate(options: ContextOptions) -> RunStats {
    let root = Context::root(options).unwrap();
    let renderer = MiniJinjaRenderer::new();
    TemplateMachine::new(&renderer).generate(&root).unwrap()
}
