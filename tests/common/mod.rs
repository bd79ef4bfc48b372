// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp directories and sample workflow documents

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

/// Workflow exercising every supported trigger filter, both runner forms and
/// the env layers.
pub const FULL_WORKFLOW: &str = r#"
name: sample workflow
on:
  push:
    branches:
      - main
      - master
    tags:
      - v*.*.*
    paths:
      - src/**/*.cs
    branches-ignore:
      - test/*
    tags-ignore:
      - v*.*.*-beta.*
    paths-ignore:
      - build/*
      - dist/*
  pull_request:
    branches:
      - main
      - master
    tags:
      - v*.*.*
    paths:
      - src/**/*.cs
    branches-ignore:
      - test/*
    tags-ignore:
      - v*.*.*-beta.*
    paths-ignore:
      - build/*
      - dist/*
    types:
      - opened
      - synchronize
      - reopened
env:
  SAMPLE_ENV1: sample1
  SAMPLE_ENV2: sample2
defaults:
  run:
    shell: pwsh
    working-directory: work/sample
permissions: read-all
jobs:
  build:
    name: sample job1
    permissions: read-all
    runs-on: ubuntu-18.04
    env:
      JOB_SAMPLE_ENV1: sample3
      JOB_SAMPLE_ENV2: 1
    defaults:
      run:
        shell: bash
        working-directory: jobwork/sample
    if: ${{ github.event_name == 'push' }}
    steps:
      - name: checkout
        id: checkout
        uses: actions/checkout@v2
        with:
          fetch-depth: 1
      - name: run echo
        id: echo
        working-directory: step/sample
        shell: bash
        env:
          STEP_SAMPLE_ENV1: sample5
        run: |
          echo $STEP_SAMPLE_ENV1
  archive:
    runs-on: [self-hosted, linux, gpu]
    needs: [build]
    steps:
      - name: sample
        run: |
          echo ${{ github.event_name }}
"#;

pub const MINIMAL_WORKFLOW: &str = r#"
name: sample
on: push
jobs:
  sample:
    runs-on: ubuntu-latest
"#;

pub const MISSING_ON_WORKFLOW: &str = r#"
name: sample
jobs:
  sample:
    runs-on: ubuntu-latest
"#;

pub const MISSING_JOBS_WORKFLOW: &str = r#"
name: sample
on: push
"#;

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn workflow_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.yml", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join("out").join(format!("{}_output.json", name))
    }

    pub async fn create_workflow_file(&self, name: &str, content: &str) -> PathBuf {
        let workflow_file = self.workflow_file(name);
        fs::write(&workflow_file, content)
            .await
            .expect("Failed to write workflow file");
        workflow_file
    }
}

pub async fn read_json_output(
    file_path: &Path,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path).await?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    Ok(json)
}
