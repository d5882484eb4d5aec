//! Общие аргументы командной строки

use clap::Parser;
use std::path::PathBuf;

use crate::render::RasterFormat;

/// Общие аргументы для всех подкоманд
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Path to viewer configuration (default: ~/.integrator/viewer.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Переопределение настроек рендерера из командной строки
#[derive(Parser, Debug, Clone, Default)]
pub struct RendererArgs {
    /// Graph-layout executable (overrides renderer.program)
    #[arg(long)]
    pub renderer: Option<String>,

    /// Raster format requested from the renderer (overrides renderer.format)
    #[arg(long, value_enum)]
    pub format: Option<RasterFormat>,
}

impl CommonArgs {
    /// Определяет уровень логирования на основе флагов
    pub fn log_level(&self, configured: tracing::Level) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            configured
        }
    }

    /// Проверяет, нужно ли выводить информацию
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
