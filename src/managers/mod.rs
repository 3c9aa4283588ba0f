// JGChat state managers
// Managers handle stateful data access: the question log.

pub mod question_log;
