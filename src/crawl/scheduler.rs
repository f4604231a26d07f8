// src/crawl/scheduler.rs
// =============================================================================
// Runs the crawl with a fixed cap on concurrent fetches.
//
// How it works:
// 1. Fill: while the frontier has items and fewer than `concurrency`
//    workers are running, pop an item and spawn a worker for it
// 2. Wait for whichever worker finishes first
// 3. Queue that worker's new neighbors, tally its verdict, go back to 1
// 4. Stop when the frontier is empty and no worker is running
//
// Only this loop touches the frontier and the visited set. Workers run as
// tokio tasks and report back through a JoinSet, so there is no shared
// mutable state between them.
// =============================================================================

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;

use super::policy::DepthPolicy;
use super::queue::{Frontier, FrontierItem};
use super::worker::{process_item, Verdict, WorkerOutcome};
use crate::corpus::CorpusStore;
use crate::fetch::Fetcher;

/// Counts reported when the crawl finishes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// WebIDs with an OIDC issuer (re-confirmed ones included)
    pub accepted: usize,
    /// Parsed fine, no OIDC issuer
    pub ignored: usize,
    /// Fetch or parse failed
    pub failed: usize,
    /// Accepted but the corpus write failed
    pub persist_failures: usize,
    /// Distinct WebIDs queued during the run
    pub visited: usize,
}

impl CrawlSummary {
    fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Accepted { persisted } => {
                self.accepted += 1;
                if !persisted {
                    self.persist_failures += 1;
                }
            }
            Verdict::Ignored => self.ignored += 1,
            Verdict::FetchFailed { .. } | Verdict::ParseFailed { .. } => self.failed += 1,
        }
    }
}

/// Owns the frontier and the pool of in-flight workers
pub struct Scheduler {
    fetcher: Arc<dyn Fetcher>,
    corpus: Arc<dyn CorpusStore>,
    policy: DepthPolicy,
    concurrency: usize,
    frontier: Frontier,
}

impl Scheduler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        corpus: Arc<dyn CorpusStore>,
        policy: DepthPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            corpus,
            policy,
            // A cap of zero would never start anything
            concurrency: concurrency.max(1),
            frontier: Frontier::new(),
        }
    }

    // Crawls until there is nothing left to do
    //
    // Seeds that repeat an earlier seed are dropped; the first one wins.
    pub async fn run(mut self, seeds: Vec<FrontierItem>) -> CrawlSummary {
        for seed in seeds {
            self.frontier.enqueue(seed);
        }

        let mut summary = CrawlSummary::default();
        let mut in_flight: JoinSet<WorkerOutcome> = JoinSet::new();

        loop {
            self.fill(&mut in_flight);

            let Some(joined) = in_flight.join_next().await else {
                // Nothing running and fill() found nothing to start
                break;
            };

            match joined {
                Ok(outcome) => {
                    summary.record(&outcome.verdict);
                    let mut queued = 0;
                    for neighbor in outcome.neighbors {
                        if self.frontier.enqueue(neighbor) {
                            queued += 1;
                        }
                    }
                    if queued > 0 {
                        tracing::debug!(
                            webid = %outcome.item.identifier,
                            queued,
                            pending = self.frontier.len(),
                            "Queued new neighbors"
                        );
                    }
                }
                Err(e) => {
                    // A panicking worker only loses its own item
                    tracing::error!(error = %e, "Crawl worker did not finish");
                    summary.failed += 1;
                }
            }
        }

        summary.visited = self.frontier.visited_count();
        summary
    }

    fn fill(&mut self, in_flight: &mut JoinSet<WorkerOutcome>) {
        while in_flight.len() < self.concurrency && !self.frontier.is_empty() {
            let Some(item) = self.frontier.dequeue() else {
                break;
            };

            let fetcher = Arc::clone(&self.fetcher);
            let corpus = Arc::clone(&self.corpus);
            let policy = self.policy;

            in_flight.spawn(async move {
                process_item(item, fetcher.as_ref(), corpus.as_ref(), policy).await
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::policy::ResetPolicy;
    use crate::crawl::seeds::assemble_seeds;
    use crate::crawl::testing::{MemoryCorpus, ScriptedFetcher};
    use std::time::Duration;

    const ISSUER: &str = "<https://idp.example/>";
    const A: &str = "https://a.example/profile#me";
    const B: &str = "https://b.example/profile#me";
    const C: &str = "https://c.example/profile#me";

    fn scheduler(
        fetcher: &Arc<ScriptedFetcher>,
        corpus: &Arc<MemoryCorpus>,
        concurrency: usize,
    ) -> Scheduler {
        Scheduler::new(
            fetcher.clone(),
            corpus.clone(),
            DepthPolicy::default(),
            concurrency,
        )
    }

    #[tokio::test]
    async fn test_unaccepted_seed_leads_to_accepted_friend() {
        // a: no issuer, knows b. b: issuer, knows a and c. c: unreachable.
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .profile(A, None, &[B])
                .profile(B, Some(ISSUER), &[A, C]),
        );
        let corpus = Arc::new(MemoryCorpus::new());

        let summary = scheduler(&fetcher, &corpus, 100)
            .run(vec![FrontierItem::seed(A)])
            .await;

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.visited, 3);
        assert_eq!(corpus.keys(), vec![B.to_string()]);
        assert_eq!(fetcher.calls(A), 1);
        assert_eq!(fetcher.calls(B), 1);
        assert_eq!(fetcher.calls(C), 1);
    }

    #[tokio::test]
    async fn test_each_webid_fetched_once() {
        // A small clique: everybody knows everybody
        let all = ["https://1.example/#me", "https://2.example/#me", "https://3.example/#me", "https://4.example/#me"];
        let mut fetcher = ScriptedFetcher::new();
        for webid in all {
            fetcher = fetcher.profile(webid, Some(ISSUER), &all);
        }
        let fetcher = Arc::new(fetcher);
        let corpus = Arc::new(MemoryCorpus::new());

        let seeds = all.iter().map(|w| FrontierItem::seed(*w)).collect();
        let summary = scheduler(&fetcher, &corpus, 2).run(seeds).await;

        assert_eq!(summary.accepted, 4);
        assert_eq!(fetcher.total_calls(), 4);
        for webid in all {
            assert_eq!(fetcher.calls(webid), 1);
        }
    }

    #[tokio::test]
    async fn test_chain_of_ignored_profiles_stops_at_depth_three() {
        // 0 -> 1 -> 2 -> 3 -> 4, none accepted
        let chain: Vec<String> = (0..5).map(|i| format!("https://n{}.example/#me", i)).collect();
        let mut fetcher = ScriptedFetcher::new();
        for pair in chain.windows(2) {
            fetcher = fetcher.profile(&pair[0], None, &[pair[1].as_str()]);
        }
        fetcher = fetcher.profile(&chain[4], None, &[]);
        let fetcher = Arc::new(fetcher);
        let corpus = Arc::new(MemoryCorpus::new());

        let summary = scheduler(&fetcher, &corpus, 10)
            .run(vec![FrontierItem::seed(chain[0].clone())])
            .await;

        // n3 sits at depth 3 and is crawled, but does not expand to n4
        assert_eq!(fetcher.calls(&chain[3]), 1);
        assert_eq!(fetcher.calls(&chain[4]), 0);
        assert_eq!(summary.visited, 4);
        assert_eq!(summary.accepted, 0);
    }

    #[tokio::test]
    async fn test_chain_of_accepted_profiles_is_followed_to_the_end() {
        let chain: Vec<String> = (0..8).map(|i| format!("https://v{}.example/#me", i)).collect();
        let mut fetcher = ScriptedFetcher::new();
        for pair in chain.windows(2) {
            fetcher = fetcher.profile(&pair[0], Some(ISSUER), &[pair[1].as_str()]);
        }
        fetcher = fetcher.profile(&chain[7], Some(ISSUER), &[]);
        let fetcher = Arc::new(fetcher);
        let corpus = Arc::new(MemoryCorpus::new());

        let summary = scheduler(&fetcher, &corpus, 10)
            .run(vec![FrontierItem::seed(chain[0].clone())])
            .await;

        assert_eq!(summary.accepted, 8);
        assert_eq!(corpus.keys().len(), 8);
    }

    #[tokio::test]
    async fn test_accepted_profile_resets_depth_of_friends() {
        // Seeded at depth 2 through an explicit item; b is accepted, so c
        // comes in at depth 0 and its own friend d is still reached.
        let d = "https://d.example/profile#me";
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .profile(B, Some(ISSUER), &[C])
                .profile(C, None, &[d])
                .profile(d, None, &[]),
        );
        let corpus = Arc::new(MemoryCorpus::new());

        scheduler(&fetcher, &corpus, 10)
            .run(vec![FrontierItem::new(B, 2)])
            .await;

        assert_eq!(fetcher.calls(C), 1);
        assert_eq!(fetcher.calls(d), 1);
    }

    #[tokio::test]
    async fn test_always_reset_variant_ignores_acceptance() {
        let chain: Vec<String> = (0..6).map(|i| format!("https://r{}.example/#me", i)).collect();
        let mut fetcher = ScriptedFetcher::new();
        for pair in chain.windows(2) {
            fetcher = fetcher.profile(&pair[0], None, &[pair[1].as_str()]);
        }
        fetcher = fetcher.profile(&chain[5], None, &[]);
        let fetcher = Arc::new(fetcher);
        let corpus = Arc::new(MemoryCorpus::new());

        let policy = DepthPolicy::new(3, ResetPolicy::Always);
        let summary = Scheduler::new(fetcher.clone(), corpus.clone(), policy, 10)
            .run(vec![FrontierItem::seed(chain[0].clone())])
            .await;

        assert_eq!(summary.visited, 6);
        assert_eq!(fetcher.calls(&chain[5]), 1);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_respected() {
        let hub = "https://hub.example/#me";
        let friends: Vec<String> = (0..30).map(|i| format!("https://f{}.example/#me", i)).collect();
        let friend_refs: Vec<&str> = friends.iter().map(String::as_str).collect();

        let mut fetcher = ScriptedFetcher::new()
            .with_delay(Duration::from_millis(5))
            .profile(hub, Some(ISSUER), &friend_refs);
        for friend in &friends {
            fetcher = fetcher.profile(friend, Some(ISSUER), &[]);
        }
        let fetcher = Arc::new(fetcher);
        let corpus = Arc::new(MemoryCorpus::new());

        let summary = scheduler(&fetcher, &corpus, 4)
            .run(vec![FrontierItem::seed(hub)])
            .await;

        assert_eq!(summary.accepted, 31);
        assert!(fetcher.max_in_flight() <= 4, "saw {} in flight", fetcher.max_in_flight());
        assert!(fetcher.max_in_flight() >= 2);
    }

    #[tokio::test]
    async fn test_empty_seed_list_terminates() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let corpus = Arc::new(MemoryCorpus::new());

        let summary = scheduler(&fetcher, &corpus, 100).run(vec![]).await;

        assert_eq!(summary, CrawlSummary::default());
    }

    #[tokio::test]
    async fn test_write_failures_are_counted_not_fatal() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .profile(A, Some(ISSUER), &[B])
                .profile(B, Some(ISSUER), &[]),
        );
        let corpus = Arc::new(MemoryCorpus::failing_writes());

        let summary = scheduler(&fetcher, &corpus, 10)
            .run(vec![FrontierItem::seed(A)])
            .await;

        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.persist_failures, 2);
        assert!(corpus.is_empty());
    }

    #[tokio::test]
    async fn test_resume_from_corpus_reconfirms_entry() {
        let x = "https://x.example/profile#me";
        let fetcher = Arc::new(ScriptedFetcher::new().profile(x, Some(ISSUER), &[]));
        let stored = fetcher.body(x).unwrap();
        let corpus = Arc::new(MemoryCorpus::new().with_entry(x, &stored));

        let seeds = assemble_seeds(corpus.as_ref(), vec![], vec![]).await.unwrap();
        assert_eq!(seeds.items, vec![FrontierItem::seed(x)]);

        let summary = scheduler(&fetcher, &corpus, 100).run(seeds.items).await;

        assert_eq!(summary.accepted, 1);
        assert_eq!(corpus.writes(), 1);
        assert_eq!(corpus.keys(), vec![x.to_string()]);
        assert_eq!(corpus.get(x).unwrap(), stored);
    }

    #[tokio::test]
    async fn test_second_run_never_shrinks_corpus() {
        // b used to be valid and is in the corpus, but is now unreachable
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .profile(A, Some(ISSUER), &[C])
                .profile(C, None, &[]),
        );
        let corpus = Arc::new(MemoryCorpus::new().with_entry(B, "old body"));

        for _ in 0..2 {
            let before = corpus.keys();
            let seeds = assemble_seeds(corpus.as_ref(), vec![], vec![A.to_string()])
                .await
                .unwrap();
            scheduler(&fetcher, &corpus, 10).run(seeds.items).await;

            let after = corpus.keys();
            assert!(before.iter().all(|k| after.contains(k)));
        }

        assert_eq!(corpus.keys(), vec![A.to_string(), B.to_string()]);
        assert_eq!(corpus.get(B).unwrap(), b"old body".to_vec());
    }

    #[tokio::test]
    async fn test_http_profile_lands_in_corpus_unchanged() {
        use crate::corpus::DirCorpus;
        use crate::fetch::HttpFetcher;
        use crate::profile::vocab;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        let webid = format!("{}/card#me", mock_server.uri());
        let body = format!(
            "<{}> <{}> <https://idp.example/> .\n<{}> <{}> \"{}\" .\n",
            webid,
            vocab::SOLID_OIDC_ISSUER,
            webid,
            vocab::FOAF_NAME,
            "Ren\u{e9}"
        )
        .into_bytes();

        // The charset label is wrong on purpose; the bytes must survive anyway
        Mock::given(method("GET"))
            .and(path("/card"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body.clone(), "text/turtle; charset=iso-8859-1"),
            )
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let corpus = Arc::new(DirCorpus::open(dir.path()).await.unwrap());
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        let summary = Scheduler::new(fetcher, corpus.clone(), DepthPolicy::default(), 4)
            .run(vec![FrontierItem::seed(webid.as_str())])
            .await;

        assert_eq!(summary.accepted, 1);
        assert_eq!(corpus.read(&webid).await.unwrap(), body);
    }
}
