//! Weibo Comment Sentiment Analyzer
//!
//! CLI host for the two-stage classifier: GLM-4 API mode with a local
//! keyword fallback, plus case generation and an interactive session.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weibo_sentiment::{
    cases::{CaseCategory, CaseGenerator},
    classifier::{classify_local, Classification, Classifier, Sentiment},
    client::{ChatCompletion, GlmClient},
    config::Config,
    risk::{self, canned_advice, Advice, RiskAdvisor},
    session::SessionState,
};

#[derive(Parser)]
#[command(name = "weibo-sentiment")]
#[command(about = "Sentiment analysis for Weibo comments via GLM-4, with a local rule fallback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single comment
    Analyze {
        /// The comment text
        text: String,
        /// Use the local keyword rules instead of the GLM API
        #[arg(long)]
        local: bool,
    },
    /// Generate an example comment of a given category
    Generate {
        /// Emotional category of the comment
        #[arg(value_enum)]
        category: CaseCategory,
        /// Classify the generated comment immediately
        #[arg(long)]
        analyze: bool,
    },
    /// Interactive session: classify lines from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { text, local } => analyze(&cli.config, &text, local).await,
        Commands::Generate { category, analyze } => generate(&cli.config, category, analyze).await,
        Commands::Interactive => interactive(&cli.config).await,
    }
}

async fn analyze(config_path: &str, text: &str, local: bool) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("请输入评论内容");
    }

    let mut session = SessionState::new();

    if local {
        run_analysis(text, false, None, None, &mut session).await;
        return Ok(());
    }

    let config = Config::load(config_path).context("loading configuration")?;
    let client: Arc<dyn ChatCompletion> = Arc::new(GlmClient::new(&config.glm)?);
    let classifier = Classifier::new(client.clone(), config.analysis.clone());
    let advisor = RiskAdvisor::new(client, &config.analysis);

    run_analysis(
        text,
        config.analysis.use_api,
        Some(&classifier),
        Some(&advisor),
        &mut session,
    )
    .await;
    Ok(())
}

async fn generate(
    config_path: &str,
    category: CaseCategory,
    analyze_after: bool,
) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("loading configuration")?;
    let client: Arc<dyn ChatCompletion> = Arc::new(GlmClient::new(&config.glm)?);
    let generator = CaseGenerator::new(client.clone(), &config.analysis);

    let text = match generator.generate(category).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("case generation failed: {}", e);
            anyhow::bail!("生成失败，请重试");
        }
    };

    println!("\n📚 {} 案例:", category.label());
    println!("{}", text);
    println!("研究重点: {}", category.focus());

    if analyze_after {
        let classifier = Classifier::new(client.clone(), config.analysis.clone());
        let advisor = RiskAdvisor::new(client, &config.analysis);
        let mut session = SessionState::new();
        run_analysis(&text, true, Some(&classifier), Some(&advisor), &mut session).await;
    }
    Ok(())
}

async fn interactive(config_path: &str) -> anyhow::Result<()> {
    // The API is optional here; without a usable config everything runs on
    // the local rules.
    let config = Config::load(config_path)
        .or_else(|_| Config::load_default())
        .ok();
    let client: Option<Arc<dyn ChatCompletion>> = match &config {
        Some(cfg) => Some(Arc::new(GlmClient::new(&cfg.glm)?)),
        None => None,
    };

    let analysis = config
        .as_ref()
        .map(|c| c.analysis.clone())
        .unwrap_or_default();
    let classifier = client
        .clone()
        .map(|c| Classifier::new(c, analysis.clone()));
    let advisor = client.clone().map(|c| RiskAdvisor::new(c, &analysis));
    let generator = client.clone().map(|c| CaseGenerator::new(c, &analysis));

    let mut session = SessionState::new();
    let mut use_api = client.is_some() && analysis.use_api;

    if client.is_none() {
        println!("⚠️  未找到配置文件，使用本地规则模式");
    }
    println!("输入评论进行分析。命令:");
    println!("  :gen <joy|anxiety|irony|mixed|neutral>  生成案例");
    println!("  :case   分析当前案例    :local/:api  切换模式");
    println!("  :stats  查看统计        :quit  退出");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ":quit" | ":q" => break,
            ":local" => {
                use_api = false;
                println!("🔧 本地规则模式");
                continue;
            }
            ":api" => {
                if classifier.is_some() {
                    use_api = true;
                    println!("🤖 GLM-4 模式");
                } else {
                    println!("❌ 未配置API，无法切换");
                }
                continue;
            }
            ":stats" => {
                print_stats(&session);
                continue;
            }
            ":case" => {
                match session.current_case.clone() {
                    Some(case) => {
                        run_analysis(
                            &case.text,
                            use_api,
                            classifier.as_ref(),
                            advisor.as_ref(),
                            &mut session,
                        )
                        .await
                    }
                    None => println!("⚠️  请先用 :gen 生成案例"),
                }
                continue;
            }
            _ => {}
        }

        if let Some(arg) = line.strip_prefix(":gen") {
            handle_generate(generator.as_ref(), arg.trim(), &mut session).await;
            continue;
        }

        run_analysis(line, use_api, classifier.as_ref(), advisor.as_ref(), &mut session).await;
    }

    print_stats(&session);
    Ok(())
}

/// Classify one comment, print the result, screen for risk and record it.
async fn run_analysis(
    text: &str,
    use_api: bool,
    classifier: Option<&Classifier>,
    advisor: Option<&RiskAdvisor>,
    session: &mut SessionState,
) {
    let started = Instant::now();
    let result = match (use_api, classifier) {
        (true, Some(c)) => c.classify_api(text).await,
        _ => classify_local(text),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    print_result(text, &result, elapsed_ms);

    let high_risk = risk::is_high_risk(result.sentiment, text);
    session.record(text, result, high_risk, elapsed_ms);

    if high_risk {
        println!("\n⚠️  检测到高危表达，请多加关注：");
        let advice = match (use_api, advisor) {
            (true, Some(a)) => a.advise(text).await,
            _ => canned_advice(),
        };
        print_advice(&advice);
    }
}

async fn handle_generate(
    generator: Option<&CaseGenerator>,
    arg: &str,
    session: &mut SessionState,
) {
    let Some(generator) = generator else {
        println!("❌ 未配置API，无法生成案例");
        return;
    };

    let category = match CaseCategory::from_str(arg, true) {
        Ok(category) => category,
        Err(_) => {
            println!("⚠️  未知类别: {} (joy|anxiety|irony|mixed|neutral)", arg);
            return;
        }
    };

    match generator.generate(category).await {
        Ok(text) => {
            println!("\n📚 {} 案例:\n{}", category.label(), text);
            session.set_case(category, text);
        }
        Err(e) => {
            tracing::warn!("case generation failed: {}", e);
            println!("❌ 生成失败，请重试");
        }
    }
}

fn print_result(text: &str, result: &Classification, elapsed_ms: u64) {
    println!("\n📝 {}", text);
    println!(
        "{} 情感倾向: {} | 置信度: {:.1}% | 耗时: {}ms",
        result.engine.marker(),
        result.sentiment,
        result.confidence * 100.0,
        elapsed_ms
    );

    match result.sentiment {
        Sentiment::Positive => println!("🌟 检测到积极情感"),
        Sentiment::Negative => println!("💡 检测到消极情感，可能需要关注"),
        Sentiment::Neutral => println!("📄 情感倾向中性"),
        Sentiment::ApiError => println!("❌ API不可用，可加 --local 改用本地规则"),
    }
}

fn print_advice(advice: &[Advice]) {
    for item in advice {
        println!("  [{}] {}", item.category.title(), item.text);
    }
}

fn print_stats(session: &SessionState) {
    println!("\n📊 本次会话统计");
    println!("  分析次数: {}", session.analyses_run());
    println!("  案例生成次数: {}", session.cases_generated());
    println!("  高危预警次数: {}", session.flagged());
    if let Some(last) = session.last_result() {
        println!(
            "  最近一次: {} {} ({:.1}%)",
            last.outcome.engine.marker(),
            last.outcome.sentiment,
            last.outcome.confidence * 100.0
        );
    }
}
