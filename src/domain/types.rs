// ==========================================
// 车间工单排产系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工序状态 (Operation Status)
// ==========================================
// 红线: DONE / CANCELED 不参与排产,且永不被引擎改写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Ready,      // 就绪
    InProgress, // 进行中
    Paused,     // 暂停
    Waiting,    // 等待
    Done,       // 完工
    Canceled,   // 取消
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl OperationStatus {
    /// 从数据库字符串解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "READY" => Some(OperationStatus::Ready),
            "IN_PROGRESS" => Some(OperationStatus::InProgress),
            "PAUSED" => Some(OperationStatus::Paused),
            "WAITING" => Some(OperationStatus::Waiting),
            "DONE" => Some(OperationStatus::Done),
            "CANCELED" => Some(OperationStatus::Canceled),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationStatus::Ready => "READY",
            OperationStatus::InProgress => "IN_PROGRESS",
            OperationStatus::Paused => "PAUSED",
            OperationStatus::Waiting => "WAITING",
            OperationStatus::Done => "DONE",
            OperationStatus::Canceled => "CANCELED",
        }
    }

    /// 终态工序不进入排产,也不被改写
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Done | OperationStatus::Canceled)
    }

    /// 钉住态: reschedule 模式下保留已有日期与机台
    pub fn is_pinned(&self) -> bool {
        matches!(self, OperationStatus::InProgress | OperationStatus::Paused)
    }
}

// ==========================================
// 工序类型 (Operation Type)
// ==========================================
// OUTSIDE (委外) 工序不参与机台指派
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Inside,  // 厂内
    Outside, // 委外
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl OperationType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INSIDE" => Some(OperationType::Inside),
            "OUTSIDE" => Some(OperationType::Outside),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationType::Inside => "INSIDE",
            OperationType::Outside => "OUTSIDE",
        }
    }
}

// ==========================================
// 工序衔接方式 (Operation Order Kind)
// ==========================================
// WITH_PREVIOUS 仅在建图阶段作为并行分组标记,
// 建图完成后它只是与组友共享前驱的普通节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationOrderKind {
    AfterPrevious, // 顺接上道
    WithPrevious,  // 与上道并行
}

impl fmt::Display for OperationOrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl OperationOrderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AFTER_PREVIOUS" => Some(OperationOrderKind::AfterPrevious),
            "WITH_PREVIOUS" => Some(OperationOrderKind::WithPrevious),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationOrderKind::AfterPrevious => "AFTER_PREVIOUS",
            OperationOrderKind::WithPrevious => "WITH_PREVIOUS",
        }
    }
}

// ==========================================
// 交期类型 (Deadline Type)
// ==========================================
// 排序口径: ASAP < HARD_DEADLINE < SOFT_DEADLINE < NO_DEADLINE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    Asap,         // 越快越好
    HardDeadline, // 硬交期
    SoftDeadline, // 软交期
    NoDeadline,   // 无交期
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl DeadlineType {
    /// 从字符串解析;未知/缺失按 NO_DEADLINE 处理
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ASAP" => DeadlineType::Asap,
            "HARD_DEADLINE" => DeadlineType::HardDeadline,
            "SOFT_DEADLINE" => DeadlineType::SoftDeadline,
            _ => DeadlineType::NoDeadline,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DeadlineType::Asap => "ASAP",
            DeadlineType::HardDeadline => "HARD_DEADLINE",
            DeadlineType::SoftDeadline => "SOFT_DEADLINE",
            DeadlineType::NoDeadline => "NO_DEADLINE",
        }
    }

    /// 排序秩: 数值小者优先
    pub fn rank(&self) -> i32 {
        match self {
            DeadlineType::Asap => 0,
            DeadlineType::HardDeadline => 1,
            DeadlineType::SoftDeadline => 2,
            DeadlineType::NoDeadline => 3,
        }
    }
}

// ==========================================
// 工时单位 (Rate Unit)
// ==========================================
// 时间值附带的量纲,决定按数量换算工时的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateUnit {
    TotalHours,           // 总工时(小时)
    TotalMinutes,         // 总工时(分钟)
    HoursPerPiece,        // 小时/件
    HoursPer100Pieces,    // 小时/百件
    HoursPer1000Pieces,   // 小时/千件
    MinutesPerPiece,      // 分钟/件
    MinutesPer100Pieces,  // 分钟/百件
    MinutesPer1000Pieces, // 分钟/千件
    SecondsPerPiece,      // 秒/件
    PiecesPerHour,        // 件/小时
    PiecesPerMinute,      // 件/分钟
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl RateUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TOTAL_HOURS" => Some(RateUnit::TotalHours),
            "TOTAL_MINUTES" => Some(RateUnit::TotalMinutes),
            "HOURS_PER_PIECE" => Some(RateUnit::HoursPerPiece),
            "HOURS_PER_100_PIECES" => Some(RateUnit::HoursPer100Pieces),
            "HOURS_PER_1000_PIECES" => Some(RateUnit::HoursPer1000Pieces),
            "MINUTES_PER_PIECE" => Some(RateUnit::MinutesPerPiece),
            "MINUTES_PER_100_PIECES" => Some(RateUnit::MinutesPer100Pieces),
            "MINUTES_PER_1000_PIECES" => Some(RateUnit::MinutesPer1000Pieces),
            "SECONDS_PER_PIECE" => Some(RateUnit::SecondsPerPiece),
            "PIECES_PER_HOUR" => Some(RateUnit::PiecesPerHour),
            "PIECES_PER_MINUTE" => Some(RateUnit::PiecesPerMinute),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RateUnit::TotalHours => "TOTAL_HOURS",
            RateUnit::TotalMinutes => "TOTAL_MINUTES",
            RateUnit::HoursPerPiece => "HOURS_PER_PIECE",
            RateUnit::HoursPer100Pieces => "HOURS_PER_100_PIECES",
            RateUnit::HoursPer1000Pieces => "HOURS_PER_1000_PIECES",
            RateUnit::MinutesPerPiece => "MINUTES_PER_PIECE",
            RateUnit::MinutesPer100Pieces => "MINUTES_PER_100_PIECES",
            RateUnit::MinutesPer1000Pieces => "MINUTES_PER_1000_PIECES",
            RateUnit::SecondsPerPiece => "SECONDS_PER_PIECE",
            RateUnit::PiecesPerHour => "PIECES_PER_HOUR",
            RateUnit::PiecesPerMinute => "PIECES_PER_MINUTE",
        }
    }
}
