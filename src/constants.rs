/// 每次答对奖励的经验值
pub const XP_PER_CORRECT: u64 = 10;

/// 每升一级所需经验值（线性）
pub const XP_PER_LEVEL: u64 = 100;

/// 总结页准确率：每个错误扣除的百分点
pub const ACCURACY_PENALTY_PER_MISTAKE: u32 = 10;

/// 个人资料页：每完成一步计入的经验值
pub const DISPLAY_XP_PER_COMPLETED: u64 = 10;

/// 个人资料页：每个展示等级所需经验值
pub const DISPLAY_XP_PER_LEVEL: u64 = 500;

/// "快速学习者" 里程碑的时间上限（毫秒）
pub const FAST_LEARNER_MAX_MS: u64 = 60_000;

/// 每秒毫秒数
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// 课程标识符的分段分隔符
pub const LESSON_KEY_DELIMITER: char = '-';

/// 默认展示名
pub const DEFAULT_DISPLAY_NAME: &str = "Estudiante de Física";

/// 默认头像预设
pub const DEFAULT_AVATAR: &str = "avatar_1";
