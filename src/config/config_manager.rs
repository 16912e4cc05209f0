// ==========================================
// 车间工单排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、缓存
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::schedule_config_trait::ScheduleConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, RwLock};

/// 配置键常量
pub mod config_keys {
    /// 单个工作日折算的工时数
    pub const HOURS_PER_DAY: &str = "schedule/hours_per_day";
}

/// 单个工作日工时数的默认值
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    cache: RwLock<HashMap<String, Option<String>>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 为保证连接行为一致,会对传入连接再次应用统一 PRAGMA (幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self {
            conn,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(v) = cache.get(key) {
                return Ok(v.clone());
            }
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        let value = match result {
            Ok(value) => Some(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(Box::new(e)),
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), value.clone());
        }

        Ok(value)
    }

    /// 失效缓存 (配置写入后调用,确保后续读取拿到最新值)
    pub fn invalidate_cache_all(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// 写入 global scope 的配置值 (测试与运维用)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        {
            let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            conn.execute(
                r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
                   VALUES ('global', ?1, ?2, datetime('now'))
                   ON CONFLICT (scope_id, key) DO UPDATE SET
                       value = excluded.value, updated_at = excluded.updated_at"#,
                params![key, value],
            )?;
        }
        self.invalidate_cache_all();
        Ok(())
    }
}

// ==========================================
// ScheduleConfigReader 实现
// ==========================================
#[async_trait]
impl ScheduleConfigReader for ConfigManager {
    async fn get_hours_per_day(&self) -> Result<f64, Box<dyn Error>> {
        let raw = self.get_config_value(config_keys::HOURS_PER_DAY)?;

        let Some(raw) = raw else {
            return Ok(DEFAULT_HOURS_PER_DAY);
        };

        let parsed: f64 = raw
            .trim()
            .parse()
            .map_err(|e| format!("配置 {} 取值非法 '{}': {}", config_keys::HOURS_PER_DAY, raw, e))?;

        if parsed <= 0.0 {
            return Err(format!(
                "配置 {} 必须为正数,实际为 {}",
                config_keys::HOURS_PER_DAY, parsed
            )
            .into());
        }

        Ok(parsed)
    }
}
