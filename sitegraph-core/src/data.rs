use rusqlite::{Connection, OptionalExtension, Result, params};
use sitegraph_crawler::{BrokenLink, CrawlResult, PageNode};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// SQLite-backed store for finalized crawls. One session per crawl;
/// reports and exports can be regenerated from a stored session without
/// re-crawling the site.
pub struct Database {
    conn: Connection,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl Database {
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn remove(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Optimize for bulk session writes
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- One row per crawl invocation
            CREATE TABLE IF NOT EXISTS crawl_sessions (
                id TEXT PRIMARY KEY,
                seed_url TEXT NOT NULL,
                start_time INTEGER NOT NULL,
                end_time INTEGER,
                status TEXT NOT NULL CHECK(status IN ('completed', 'cancelled')),
                failed_fetches INTEGER NOT NULL DEFAULT 0
            );

            -- Pages of the graph, keyed by normalized URL
            CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                url TEXT NOT NULL,
                depth INTEGER NOT NULL,
                response_code INTEGER NOT NULL,
                content_type TEXT,
                FOREIGN KEY(session_id) REFERENCES crawl_sessions(id) ON DELETE CASCADE,
                UNIQUE(session_id, url)
            );

            CREATE INDEX IF NOT EXISTS idx_nodes_session ON nodes(session_id);

            -- Directed page-to-page links
            CREATE TABLE IF NOT EXISTS edges (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                source_url TEXT NOT NULL,
                target_url TEXT NOT NULL,
                FOREIGN KEY(session_id) REFERENCES crawl_sessions(id) ON DELETE CASCADE,
                UNIQUE(session_id, source_url, target_url)
            );

            CREATE INDEX IF NOT EXISTS idx_edges_session ON edges(session_id);

            -- 404 targets with the hop path that reached them (JSON array)
            CREATE TABLE IF NOT EXISTS broken_links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                url TEXT NOT NULL,
                path TEXT NOT NULL,
                FOREIGN KEY(session_id) REFERENCES crawl_sessions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_broken_links_session ON broken_links(session_id);
            ",
        )?;
        Ok(())
    }

    /// Persist a finalized crawl in one transaction. Returns the new
    /// session id.
    pub fn save_result(&mut self, result: &CrawlResult, started_at: i64) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let status = if result.cancelled {
            "cancelled"
        } else {
            "completed"
        };

        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO crawl_sessions (id, seed_url, start_time, end_time, status, failed_fetches)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &session_id,
                &result.seed,
                started_at,
                current_timestamp(),
                status,
                result.failed_fetches as i64,
            ],
        )?;

        for node in &result.nodes {
            tx.execute(
                "INSERT INTO nodes (session_id, url, depth, response_code, content_type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &session_id,
                    &node.url,
                    node.depth as i64,
                    node.status_code,
                    &node.content_type,
                ],
            )?;
        }

        for (source, target) in &result.edges {
            tx.execute(
                "INSERT INTO edges (session_id, source_url, target_url) VALUES (?1, ?2, ?3)",
                params![&session_id, source, target],
            )?;
        }

        for broken in &result.broken_links {
            let path_json = serde_json::to_string(&broken.path).unwrap_or_default();
            tx.execute(
                "INSERT INTO broken_links (session_id, url, path) VALUES (?1, ?2, ?3)",
                params![&session_id, &broken.url, path_json],
            )?;
        }

        tx.commit()?;
        Ok(session_id)
    }

    /// Rebuild the crawl result shape for a stored session.
    pub fn load_result(&self, session_id: &str) -> Result<CrawlResult> {
        let (seed, status, failed_fetches): (String, String, i64) = self.conn.query_row(
            "SELECT seed_url, status, failed_fetches FROM crawl_sessions WHERE id = ?1",
            params![session_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT url, depth, response_code, content_type FROM nodes
             WHERE session_id = ?1 ORDER BY depth, url",
        )?;
        let nodes = stmt
            .query_map(params![session_id], |row| {
                Ok(PageNode {
                    url: row.get(0)?,
                    depth: row.get::<_, i64>(1)? as usize,
                    status_code: row.get(2)?,
                    content_type: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT source_url, target_url FROM edges WHERE session_id = ?1 ORDER BY id",
        )?;
        let edges = stmt
            .query_map(params![session_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT url, path FROM broken_links WHERE session_id = ?1 ORDER BY id")?;
        let broken_links = stmt
            .query_map(params![session_id], |row| {
                let url: String = row.get(0)?;
                let path_json: String = row.get(1)?;
                Ok((url, path_json))
            })?
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .map(|(url, path_json)| BrokenLink {
                url,
                path: serde_json::from_str(&path_json).unwrap_or_default(),
            })
            .collect();

        Ok(CrawlResult {
            seed,
            nodes,
            edges,
            broken_links,
            failed_fetches: failed_fetches as usize,
            cancelled: status == "cancelled",
        })
    }

    /// Most recently started session, if any.
    pub fn latest_session(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT id FROM crawl_sessions ORDER BY start_time DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
    }

    /// (id, seed, start_time, status, node count) per stored session,
    /// newest first.
    pub fn list_sessions(&self) -> Result<Vec<(String, String, i64, String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.seed_url, s.start_time, s.status,
                    (SELECT COUNT(*) FROM nodes n WHERE n.session_id = s.id)
             FROM crawl_sessions s
             ORDER BY s.start_time DESC, s.id DESC",
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(sessions)
    }
}
