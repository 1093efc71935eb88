use anyhow::Result;
use clap::{Parser, ValueEnum};
use mcq_generator::orchestrator::{MAX_QUESTIONS, MIN_QUESTIONS};
use mcq_generator::utils::logging;
use mcq_generator::{to_table, Config, GenerationOutput};
use std::path::PathBuf;
use tracing::error;

/// 根据 PDF / TXT 文档生成多项选择题
#[derive(Parser, Debug)]
#[command(name = "mcq-generator", version, about)]
struct Cli {
    /// 输入文件（.pdf 或 .txt）
    file: PathBuf,

    /// 题目数量
    #[arg(short = 'n', long, default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(MIN_QUESTIONS as i64..=MAX_QUESTIONS as i64))]
    count: u32,

    /// 科目
    #[arg(short, long, default_value = "Machine Learning")]
    subject: String,

    /// 语气
    #[arg(short, long, value_enum, default_value_t = Tone::Educational)]
    tone: Tone,

    /// 生成后追加一次评审调用
    #[arg(long)]
    evaluate: bool,

    /// TOML 配置文件
    #[arg(long, env = "MCQ_CONFIG")]
    config: Option<PathBuf>,

    /// 同时输出原始 JSON
    #[arg(long)]
    raw_json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Tone {
    Educational,
    Casual,
    Formal,
}

impl Tone {
    fn as_str(&self) -> &'static str {
        match self {
            Tone::Educational => "educational",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.evaluate {
        config.evaluate = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    match mcq_generator::generate(&config, &cli.file, cli.count, &cli.subject, cli.tone.as_str()).await
    {
        Ok(output) => {
            print_output(&output, cli.raw_json)?;
            Ok(())
        }
        Err(e) => {
            error!("生成失败: {}", e);
            eprintln!("错误: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_output(output: &GenerationOutput, raw_json: bool) -> Result<()> {
    println!("\n{}", "=".repeat(60));
    println!("生成的题目（共 {} 道，尝试 {} 次）", output.quiz.len(), output.attempts);
    println!("{}", "=".repeat(60));

    for (i, row) in to_table(&output.quiz).iter().enumerate() {
        println!("\n{}. {}", i + 1, row.mcq);
        for choice in row.choices.split(mcq_generator::services::table_projector::CHOICE_DELIMITER) {
            println!("   {}", choice);
        }
        println!("   正确答案: {}", row.correct);
    }

    if let Some(evaluation) = &output.evaluation {
        println!("\n{}", "-".repeat(60));
        println!("评审结论");
        println!("是否合适: {}", evaluation.is_appropriate);
        println!("复杂度分析: {}", evaluation.complexity_analysis);
    }

    if raw_json {
        println!("\n{}", "-".repeat(60));
        println!("原始 JSON");
        println!("{}", serde_json::to_string_pretty(&output.raw_json)?);
    }

    println!("\n{}", "-".repeat(60));
    println!("Token 用量");
    println!("{}", serde_json::to_string_pretty(&output.token_info)?);

    Ok(())
}
