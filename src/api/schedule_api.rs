// ==========================================
// 车间工单排产系统 - 排产接口
// ==========================================
// 职责: 请求载荷校验 + 引擎调用 + 响应组装
// 外层传输 (HTTP/认证/CORS) 由宿主适配器承担,不在本层
// 载荷键名: camelCase (与外部接口一致)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ScheduleConfigReader;
use crate::engine::orchestrator::{ScheduleOrchestrator, ScheduleRequest, ScheduleSummary};
use crate::engine::strategy::{ScheduleDirection, ScheduleMode};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleRequestDto - 原始请求载荷
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestDto {
    pub job_id: String,
    pub company_id: String,
    pub user_id: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

impl ScheduleRequestDto {
    /// 校验并转换为引擎请求
    ///
    /// 规则:
    /// - 三个ID去空白后必须非空
    /// - mode 缺省 initial,direction 缺省 backward
    /// - 未知 mode / direction 报 InvalidInput
    pub fn validate(&self) -> ApiResult<ScheduleRequest> {
        let job_id = self.job_id.trim();
        if job_id.is_empty() {
            return Err(ApiError::InvalidInput("jobId 不能为空".to_string()));
        }
        let company_id = self.company_id.trim();
        if company_id.is_empty() {
            return Err(ApiError::InvalidInput("companyId 不能为空".to_string()));
        }
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(ApiError::InvalidInput("userId 不能为空".to_string()));
        }

        let mode = match self.mode.as_deref().map(str::trim) {
            None | Some("") => ScheduleMode::default(),
            Some(raw) => raw.parse::<ScheduleMode>().map_err(ApiError::InvalidInput)?,
        };
        let direction = match self.direction.as_deref().map(str::trim) {
            None | Some("") => ScheduleDirection::default(),
            Some(raw) => raw
                .parse::<ScheduleDirection>()
                .map_err(ApiError::InvalidInput)?,
        };

        Ok(ScheduleRequest {
            job_id: job_id.to_string(),
            company_id: company_id.to_string(),
            user_id: user_id.to_string(),
            mode,
            direction,
        })
    }
}

// ==========================================
// ScheduleResponse - 排产响应
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub operations_scheduled: i64,
    pub conflicts_detected: i64,
    pub work_centers_affected: Vec<String>,
    pub assembly_depth: i64,
}

impl ScheduleResponse {
    fn from_summary(summary: ScheduleSummary) -> Self {
        Self {
            success: summary.success,
            message: None,
            operations_scheduled: summary.operations_scheduled,
            conflicts_detected: summary.conflicts_detected,
            work_centers_affected: summary.work_centers_affected,
            assembly_depth: summary.assembly_depth,
        }
    }

    /// 失败响应 (宿主适配器据此组装非 2xx 返回)
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            operations_scheduled: 0,
            conflicts_detected: 0,
            work_centers_affected: Vec::new(),
            assembly_depth: 0,
        }
    }
}

// ==========================================
// ScheduleApi - 排产接口
// ==========================================
pub struct ScheduleApi<C>
where
    C: ScheduleConfigReader,
{
    orchestrator: ScheduleOrchestrator<C>,
}

impl<C> ScheduleApi<C>
where
    C: ScheduleConfigReader,
{
    pub fn new(orchestrator: ScheduleOrchestrator<C>) -> Self {
        Self { orchestrator }
    }

    /// 排产入口: 校验载荷后执行引擎
    ///
    /// 当前日期取服务器本地民用日期
    pub async fn schedule(&self, dto: &ScheduleRequestDto) -> ApiResult<ScheduleResponse> {
        let request = dto.validate()?;
        self.schedule_with_today(&request, Local::now().date_naive())
            .await
    }

    /// 注入当前日期的排产入口 (测试与回放用)
    pub async fn schedule_with_today(
        &self,
        request: &ScheduleRequest,
        today: NaiveDate,
    ) -> ApiResult<ScheduleResponse> {
        let summary = self.orchestrator.execute(request, today).await?;
        Ok(ScheduleResponse::from_summary(summary))
    }

    /// 同步排产入口 (供非异步宿主调用)
    pub fn schedule_blocking(&self, dto: &ScheduleRequestDto) -> ApiResult<ScheduleResponse> {
        // 已在 tokio 运行时中则借用当前运行时,否则临时建一个
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.schedule(dto)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| ApiError::InternalError(format!("运行时创建失败: {}", e)))?;
            rt.block_on(self.schedule(dto))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(mode: Option<&str>, direction: Option<&str>) -> ScheduleRequestDto {
        ScheduleRequestDto {
            job_id: "J1".to_string(),
            company_id: "C1".to_string(),
            user_id: "U1".to_string(),
            mode: mode.map(|s| s.to_string()),
            direction: direction.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_validate_defaults() {
        let request = dto(None, None).validate().unwrap();
        assert_eq!(request.mode, ScheduleMode::Initial);
        assert_eq!(request.direction, ScheduleDirection::Backward);
    }

    #[test]
    fn test_validate_explicit_values() {
        let request = dto(Some("reschedule"), Some("forward")).validate().unwrap();
        assert_eq!(request.mode, ScheduleMode::Reschedule);
        assert_eq!(request.direction, ScheduleDirection::Forward);
    }

    #[test]
    fn test_validate_rejects_blank_ids() {
        let mut bad = dto(None, None);
        bad.job_id = "   ".to_string();
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_unknown_direction() {
        let err = dto(None, Some("sideways")).validate().unwrap_err();
        match err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("sideways")),
            other => panic!("预期 InvalidInput,实际 {:?}", other),
        }
    }

    #[test]
    fn test_dto_camel_case_payload() {
        let raw = r#"{"jobId":"J1","companyId":"C1","userId":"U1","direction":"forward"}"#;
        let dto: ScheduleRequestDto = serde_json::from_str(raw).unwrap();
        assert_eq!(dto.job_id, "J1");
        assert_eq!(dto.direction.as_deref(), Some("forward"));

        let response = ScheduleResponse::failure("boom".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("operationsScheduled"));
        assert!(json.contains("\"success\":false"));
    }
}
