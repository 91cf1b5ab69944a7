// ==========================================
// 高校排课系统 - 仓储层 SQL 工具
// ==========================================

/// 构建 IN 子句的 SQL 片段
///
/// # 返回
/// - 例如: "course_id IN (?, ?)"
/// - 空列表返回永假条件 "1 = 0"，确保 SQL 语法正确
pub fn build_in_clause(column_name: &str, len: usize) -> String {
    if len == 0 {
        return "1 = 0".to_string();
    }

    let placeholders = vec!["?"; len].join(", ");
    format!("{} IN ({})", column_name, placeholders)
}
