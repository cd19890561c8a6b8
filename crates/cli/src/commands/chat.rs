use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use callcenter_core::config::LoadOptions;

use crate::bootstrap::{block_on, load_config, open_service, Failure};
use crate::commands::CommandResult;
use crate::session::{ChatService, SatisfactionPanel};

const GREETING: &str =
    "Merhaba! Size nasıl yardımcı olabilirim? (/history, /rating, /reset, /quit)";

pub fn run(options: &LoadOptions, user_id: &str) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(failure) => return failure.into_result("chat"),
    };

    let result = block_on(async {
        let (service, pool) = open_service(&config).await?;
        let mut stdout = tokio::io::stdout();
        let turns = converse(&service, user_id, BufReader::new(tokio::io::stdin()), &mut stdout)
            .await
            .map_err(|error| Failure::session(format!("{error:#}")))?;
        pool.close().await;
        Ok(turns)
    });

    match result {
        Ok(turns) => {
            CommandResult::success("chat", format!("chat session ended after {turns} messages"))
        }
        Err(failure) => failure.into_result("chat"),
    }
}

/// Line-based chat loop. Returns the number of customer messages answered.
pub async fn converse<R, W>(
    service: &ChatService,
    user_id: &str,
    input: R,
    output: &mut W,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut turns = 0;
    write_line(output, GREETING).await?;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await.context("reading chat input")? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                let stored = service.history(user_id, None).await?;
                if stored.is_empty() {
                    write_line(output, "Henüz kayıtlı mesaj yok.").await?;
                }
                for entry in stored {
                    let speaker = entry.role.as_str();
                    write_line(output, &format!("[{speaker}] {}", entry.message)).await?;
                }
            }
            "/rating" => {
                let panel = service.satisfaction(user_id).await;
                write_line(output, &render_panel(&panel)).await?;
            }
            "/reset" => {
                let removed = service.reset(user_id).await?;
                let notice = format!("Sohbet geçmişi temizlendi ({removed} mesaj).");
                write_line(output, &notice).await?;
            }
            message => {
                let reply = service.send(user_id, message).await?;
                turns += 1;
                write_line(output, &format!("Asistan: {reply}")).await?;
            }
        }
    }

    Ok(turns)
}

fn render_panel(panel: &SatisfactionPanel) -> String {
    let rating = match panel.rating {
        Some(value) => format!("Memnuniyet puanı: {value}/10"),
        None if panel.survey_shown => {
            "Memnuniyet puanı: anket gösterildi, puan bekleniyor".to_string()
        }
        None => "Memnuniyet puanı: henüz verilmedi".to_string(),
    };
    match &panel.sentiment {
        Some(sentiment) => format!(
            "{rating}\nDuygu durumu: {} ({:.1}/10)",
            sentiment.sentiment.as_str(),
            sentiment.satisfaction_score
        ),
        None => rating,
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}
