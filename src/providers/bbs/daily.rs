// Файл: providers/bbs/daily.rs
// Ежедневный обход заданий: отметка, чтение, лайки, репост.
// Выполняются только задания, которых ещё нет в состоянии миссий.

use super::models::{AppForumInfo, BbsError, Board, Mission};
use super::requests::AppClient;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPlan {
    /// Разделы для отметки; посты берутся из первого.
    pub boards: Vec<Board>,
    pub read_count: usize,
    pub like_count: usize,
    pub share: bool,
    /// Снимать лайк сразу после постановки.
    pub unlike_after: bool,
    /// Пауза между запросами, мс.
    pub pause_ms: u64,
}

impl Default for DailyPlan {
    fn default() -> Self {
        Self {
            boards: vec![Board::Genshin],
            read_count: 3,
            like_count: 5,
            share: true,
            unlike_after: true,
            pause_ms: 1500,
        }
    }
}

impl DailyPlan {
    fn page_size(&self) -> u32 {
        u32::try_from(self.read_count.max(self.like_count).max(1)).unwrap_or(u32::MAX)
    }

    fn needs_posts(&self, pending: &[Mission]) -> bool {
        (pending.contains(&Mission::ReadPosts) && self.read_count > 0)
            || (pending.contains(&Mission::LikePosts) && self.like_count > 0)
            || (pending.contains(&Mission::Share) && self.share)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyReport {
    pub pending: Vec<Mission>,
    pub signed: Vec<Board>,
    pub points_gained: i64,
    pub read: usize,
    pub liked: usize,
    pub shared: bool,
    /// Нефатальные ошибки отдельных шагов.
    pub failures: Vec<String>,
}

impl DailyReport {
    fn record_failure(&mut self, step: &str, err: BbsError) {
        warn!("Daily step '{}' failed: {}", step, err);
        self.failures.push(format!("{}: {}", step, err));
    }
}

impl AppClient {
    /// Проходит все невыполненные задания по плану.
    /// Фатальны только ошибки получения заданий и списка постов.
    pub async fn run_daily(&self, plan: &DailyPlan) -> Result<DailyReport, BbsError> {
        let pause = Duration::from_millis(plan.pause_ms);
        let pending = self.get_tasks_incomplete_id_list().await?;
        let mut report = DailyReport {
            pending: pending.clone(),
            ..DailyReport::default()
        };

        if pending.is_empty() {
            info!("All daily missions are already complete");
            return Ok(report);
        }

        if pending.contains(&Mission::BbsSign) {
            for board in &plan.boards {
                pace(pause).await;
                match self.bbs_sign(board.gids()).await {
                    Ok(points) => {
                        report.signed.push(*board);
                        report.points_gained += points;
                    }
                    Err(e) => report.record_failure(&format!("sign {:?}", board), e),
                }
            }
        }

        if !plan.needs_posts(&pending) {
            return Ok(report);
        }

        let Some(board) = plan.boards.first() else {
            report
                .failures
                .push("no board configured for post missions".to_string());
            return Ok(report);
        };

        pace(pause).await;
        let posts = self.get_posts_list(board.forum_id(), plan.page_size()).await?;

        if pending.contains(&Mission::ReadPosts) {
            for post in posts.iter().take(plan.read_count) {
                pace(pause).await;
                match self.post_detail(post.post_id()).await {
                    Ok(_) => report.read += 1,
                    Err(e) => report.record_failure(&format!("read {}", post.post_id()), e),
                }
            }
        }

        if pending.contains(&Mission::LikePosts) {
            // Уже лайкнутые посты задание не засчитывают.
            let candidates = posts.iter().filter(|post| !post.is_liked());
            for post in candidates.take(plan.like_count) {
                pace(pause).await;
                match self.like_once(post, plan.unlike_after, pause).await {
                    Ok(()) => report.liked += 1,
                    Err(e) => report.record_failure(&format!("like {}", post.post_id()), e),
                }
            }
        }

        if pending.contains(&Mission::Share) && plan.share {
            if let Some(post) = posts.first() {
                pace(pause).await;
                match self.post_share(post.post_id()).await {
                    Ok(_) => report.shared = true,
                    Err(e) => report.record_failure(&format!("share {}", post.post_id()), e),
                }
            }
        }

        info!(
            "Daily run finished: signed {}, read {}, liked {}, shared {}, failures {}",
            report.signed.len(),
            report.read,
            report.liked,
            report.shared,
            report.failures.len()
        );
        Ok(report)
    }

    async fn like_once(
        &self,
        post: &AppForumInfo,
        unlike_after: bool,
        pause: Duration,
    ) -> Result<(), BbsError> {
        self.post_vote(post.post_id(), false).await?;
        if unlike_after {
            pace(pause).await;
            self.post_vote(post.post_id(), true).await?;
        }
        Ok(())
    }
}

async fn pace(pause: Duration) {
    if !pause.is_zero() {
        tokio::time::sleep(pause).await;
    }
}
