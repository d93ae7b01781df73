//! Process Action - 외부 프로그램 실행
//!
//! 모듈 파일의 `run = "..."` 항목이 이 동작으로 변환됩니다.
//! 프로그램 경로는 `which`로 미리 해석하여 "not found"를 명확히 보고합니다.

use super::traits::{CommandAction, CommandContext};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command as StdCommand;
use tide_foundation::{Error, Result};
use tracing::debug;

/// 외부 프로그램 실행 동작
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessAction {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    /// 프로젝트 루트 기준 상대 경로
    cwd: Option<PathBuf>,
}

impl ProcessAction {
    /// argv 배열에서 생성 (첫 요소가 프로그램)
    pub fn from_argv(argv: Vec<String>) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("empty command line".into()))?;

        Ok(Self {
            program,
            args: argv.collect(),
            env: BTreeMap::new(),
            cwd: None,
        })
    }

    /// 셸 문법 문자열에서 생성 (`cargo clippy -- -D warnings`)
    pub fn from_command_line(line: &str) -> Result<Self> {
        let argv = shlex::split(line)
            .ok_or_else(|| Error::InvalidInput(format!("unbalanced quotes in '{}'", line)))?;
        Self::from_argv(argv)
    }

    /// 빌더 패턴: 환경 변수 추가
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// 빌더 패턴: 작업 디렉토리 설정
    pub fn with_cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl CommandAction for ProcessAction {
    fn invoke(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<i32> {
        let working_dir = match &self.cwd {
            Some(cwd) => ctx.project_root.join(cwd),
            None => ctx.project_root.to_path_buf(),
        };

        let program = which::which_in(&self.program, std::env::var_os("PATH"), &working_dir)
            .map_err(|e| Error::execution(&self.program, format!("program not found: {}", e)))?;

        debug!(
            "Running {} {:?} {:?} in {}",
            program.display(),
            self.args,
            args,
            working_dir.display()
        );

        let status = StdCommand::new(&program)
            .args(&self.args)
            .args(args)
            .envs(&self.env)
            .current_dir(&working_dir)
            .status()
            .map_err(|e| Error::execution(&self.program, e.to_string()))?;

        // 시그널로 종료된 경우 코드가 없음
        Ok(status.code().unwrap_or(1))
    }
}
