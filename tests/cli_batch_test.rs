// ==========================================
// 命令行 / 批处理集成测试
// ==========================================
// 测试目标: 命令解析 → 服务分派 → 最佳参赛记录重算
// ==========================================


use std::fs;

use ctf_manager::cli::{BatchSummary, CommandProcessor};
use test_helpers::{count_rows, create_test_env};

#[test]
fn test_process_args_create_and_recompute_best() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    assert!(processor.process_args(["-g", "Los Hackers"]));
    assert!(processor.process_args(["-p", "1", "40"]));
    assert!(processor.process_args(["-p", "1", "85", "2"]));

    let group = env.state.group_service.get_group_by_id(1).unwrap();
    let best = env
        .state
        .participation_service
        .get_participation_by_id(group.best_participation_id.unwrap())
        .unwrap();
    assert_eq!(best.score, 85);
    assert_eq!(best.event_id, Some(2));
}

#[test]
fn test_process_args_delete_participation_clears_best() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    assert!(processor.process_args(["-g", "Solo"]));
    assert!(processor.process_args(["-p", "1", "10"]));
    assert!(processor.process_args(["-e", "1", "1"]));

    let group = env.state.group_service.get_group_by_id(1).unwrap();
    assert_eq!(group.best_participation_id, None);
}

#[test]
fn test_process_args_delete_participation_wrong_group_rejected() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    assert!(processor.process_args(["-g", "A"]));
    assert!(processor.process_args(["-g", "B"]));
    assert!(processor.process_args(["-p", "1", "10"]));

    assert!(!processor.process_args(["-e", "1", "2"]));
    assert!(env
        .state
        .participation_service
        .get_participation_by_id(1)
        .is_some());
}

#[test]
fn test_process_args_usage_error_does_not_touch_store() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    assert!(!processor.process_args(["-p", "1"]));
    assert!(!processor.process_args(["-t", "uno"]));
    assert!(!processor.process_args(["-g", "A", "-c"]));

    assert_eq!(env.reporter.errors().len(), 3);
    assert_eq!(count_rows(&env.raw_connection(), "groups"), 0);
}

#[test]
fn test_process_args_delete_group_cascades() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    assert!(processor.process_args(["-g", "Temp"]));
    assert!(processor.process_args(["-p", "1", "3"]));
    assert!(processor.process_args(["-t", "1"]));

    let conn = env.raw_connection();
    assert_eq!(count_rows(&conn, "groups"), 0);
    assert_eq!(count_rows(&conn, "participations"), 0);
}

#[test]
fn test_process_batch_skips_comments_and_rejects_bad_lines() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    let batch = "\
# grupos
-g;Alpha
-g; Beta

-p;1;60;1
-p;2;75;1
-p;1
-f;otro.txt
-x
";
    let summary = processor.process_batch(batch);
    assert_eq!(
        summary,
        BatchSummary {
            executed: 5,
            failed: 0,
            rejected: 2
        }
    );
    assert!(!summary.is_clean());

    let errors = env.reporter.errors();
    assert!(errors.iter().any(|e| e.starts_with("第7行")));
    assert!(errors.iter().any(|e| e.starts_with("第8行")));

    // -x 未带路径时写入配置的导出文件
    let exported = fs::read_to_string(&env.state.config.export_file_path).unwrap();
    assert!(exported.starts_with("CTF: 1\n1. Beta (75 分)\n2. Alpha (60 分)\n"));
}

#[test]
fn test_run_batch_from_configured_file() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    fs::write(
        &env.state.config.batch_file_path,
        "-g;Gamma\n-p;1;20\n-l\n",
    )
    .unwrap();

    assert!(processor.process_args(["-f"]));
    assert_eq!(env.state.group_service.get_all_groups().len(), 1);
    assert!(env
        .reporter
        .infos()
        .iter()
        .any(|m| m.contains("描述: Gamma")));
}

#[test]
fn test_run_batch_with_rejected_lines_reports_failure() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    fs::write(&env.state.config.batch_file_path, "-p;1\n-t;abc\n").unwrap();
    assert!(!processor.process_args(["-f"]));

    // 命令被接受但执行失败（小组不存在）同样视为失败
    fs::write(&env.state.config.batch_file_path, "-p;42;10\n").unwrap();
    assert!(!processor.process_args(["-f"]));
    assert_eq!(count_rows(&env.raw_connection(), "participations"), 0);
}

#[test]
fn test_run_batch_missing_file_reported() {
    let env = create_test_env();
    let processor = CommandProcessor::new(&env.state, env.reporter.clone());

    let missing = env.path("no_such_batch.txt");
    assert!(processor.process_batch_file(&missing).is_none());
    assert_eq!(env.reporter.errors().len(), 1);
}
