// ==========================================
// 车间工单排产系统 - 引擎仓储集束
// ==========================================
// 用途: 把编排器需要的仓储打包传递,避免长参数列表
// ==========================================

use crate::repository::{
    DependencyRepository, JobRepository, MakeMethodRepository, OperationRepository,
    ResourceRepository, ScheduleLogRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleRepositories - 仓储集束
// ==========================================
#[derive(Clone)]
pub struct ScheduleRepositories {
    pub jobs: Arc<JobRepository>,
    pub methods: Arc<MakeMethodRepository>,
    pub operations: Arc<OperationRepository>,
    pub dependencies: Arc<DependencyRepository>,
    pub resources: Arc<ResourceRepository>,
    pub logs: Arc<ScheduleLogRepository>,
}

impl ScheduleRepositories {
    /// 从共享连接构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            jobs: Arc::new(JobRepository::new(conn.clone())),
            methods: Arc::new(MakeMethodRepository::new(conn.clone())),
            operations: Arc::new(OperationRepository::new(conn.clone())),
            dependencies: Arc::new(DependencyRepository::new(conn.clone())),
            resources: Arc::new(ResourceRepository::new(conn.clone())),
            logs: Arc::new(ScheduleLogRepository::new(conn)),
        }
    }
}
