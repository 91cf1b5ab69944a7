// ==========================================
// 高校排课系统 - 领域类型定义
// ==========================================
// 职责: 注册状态、星期、求解算法等枚举
// 约定: to_db_str 为数据库存储格式, Display 与之一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 教学注册状态 (Registration Status)
// ==========================================
// 只有 APPROVED 的注册进入排课流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,  // 待审核
    Approved, // 已批准
    Rejected, // 已驳回
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl RegistrationStatus {
    /// 从字符串解析状态（未知值视为 PENDING，不会进入排课流程）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "APPROVED" => RegistrationStatus::Approved,
            "REJECTED" => RegistrationStatus::Rejected,
            _ => RegistrationStatus::Pending,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "PENDING",
            RegistrationStatus::Approved => "APPROVED",
            RegistrationStatus::Rejected => "REJECTED",
        }
    }
}

// ==========================================
// 星期 (Weekday)
// ==========================================
// 求解服务协议使用三字母缩写 ("Mon".."Sun")
// 数据库存储使用全大写英文全称 ("MONDAY".."SUNDAY")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl Weekday {
    /// 固定教学周（周一至周五）
    pub const TEACHING_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// 求解协议中的三字母缩写
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
            Weekday::Sunday => "SUNDAY",
        }
    }

    /// 解析星期（大小写不敏感，兼容三字母缩写与英文全称）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mon" | "monday" => Some(Weekday::Monday),
            "tue" | "tuesday" => Some(Weekday::Tuesday),
            "wed" | "wednesday" => Some(Weekday::Wednesday),
            "thu" | "thursday" => Some(Weekday::Thursday),
            "fri" | "friday" => Some(Weekday::Friday),
            "sat" | "saturday" => Some(Weekday::Saturday),
            "sun" | "sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

// ==========================================
// 求解算法 (Solver Algorithm)
// ==========================================
// Exact 模式受数据规模上限约束（见 config::config_keys）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverAlgorithm {
    Heuristic, // 启发式
    Exact,     // 精确求解
}

impl fmt::Display for SolverAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverAlgorithm::Heuristic => write!(f, "heuristic"),
            SolverAlgorithm::Exact => write!(f, "exact"),
        }
    }
}

impl SolverAlgorithm {
    /// 解析算法名（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Some(SolverAlgorithm::Heuristic),
            "exact" => Some(SolverAlgorithm::Exact),
            _ => None,
        }
    }
}
