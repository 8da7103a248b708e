use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use crate::{
    api::{ArticleClient, HttpTransport},
    archive::ArticleFile,
    config::{Config, ENV_CONFIG},
    content::BlockId,
    editor::{ArticleEditor, SaveSummary},
    error::Result,
    render,
};

/// 文章内容块编辑工具
#[derive(Debug, Parser)]
#[command(name = "article-editor", version, about)]
pub struct Cli {
    /// 配置文件路径（TOML）
    #[arg(long, global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 以 Markdown 输出文章预览
    Show { article: String },

    /// 导出文章到 YAML / JSON 文件
    Export { article: String, file: PathBuf },

    /// 用文件内容替换文章的元数据和块并保存
    Push {
        article: String,
        file: PathBuf,
        /// 删除服务端存在但文件中没有的块
        #[arg(long)]
        prune: bool,
    },

    /// 立即删除一个已保存的块
    DeleteBlock { article: String, block: String },

    /// 列出分类目录
    Categories,
}

/// 执行命令
pub async fn execute(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(base_url = %config.api.base_url, layout = ?config.layout, "config loaded");

    let client = ArticleClient::new(HttpTransport::new(&config.api)?, config.layout);

    match cli.command {
        Command::Show { article } => {
            let editor = ArticleEditor::open(client, article).await;
            print!("{}", render::markdown(editor.metadata(), editor.document()));
        }
        Command::Export { article, file } => {
            let editor = ArticleEditor::open(client, article).await;
            ArticleFile::from_editor(editor.metadata(), editor.document()).write(&file)?;
            println!(
                "exported {} blocks to {}",
                editor.document().len(),
                file.display()
            );
        }
        Command::Push {
            article,
            file,
            prune,
        } => return push(client, article, file, prune).await,
        Command::DeleteBlock { article, block } => {
            let mut editor = ArticleEditor::open(client, article).await;
            editor.delete_block(&BlockId::parse(block)).await?;
            println!("deleted");
        }
        Command::Categories => {
            for category in client.fetch_categories().await? {
                println!("{}\t{}", category.id, category.name);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn push(
    client: ArticleClient<HttpTransport>,
    article: String,
    file: PathBuf,
    prune: bool,
) -> Result<ExitCode> {
    let (metadata, document) = ArticleFile::read(&file)?.into_parts();
    let mut editor = ArticleEditor::open(client, article).await;
    editor.load_categories().await;

    // 保存成功后才删除文件中已经没有的块
    let report = editor.save_replacing(metadata, document, prune).await?;
    println!("{report}");

    // 写回服务端 id，再次推送时更新而不是新建
    ArticleFile::from_editor(editor.metadata(), editor.document()).write(&file)?;

    Ok(match report.summary() {
        SaveSummary::Success => ExitCode::SUCCESS,
        SaveSummary::PartialFailure | SaveSummary::Failure => ExitCode::FAILURE,
    })
}
