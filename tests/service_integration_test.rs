// ==========================================
// 服务层集成测试
// ==========================================
// 测试目标: 小组 / 参赛记录服务在真实 SQLite 上的行为
// 覆盖: 最佳参赛记录一致性、孤儿拒绝、回滚原子性、幂等删除、排名导出
// ==========================================


use std::fs;

use ctf_manager::service::Report;
use test_helpers::{count_rows, create_test_env};

#[test]
fn test_group_round_trip() {
    let env = create_test_env();
    let groups = &env.state.group_service;

    let id = groups.create_group("Los Hackers").unwrap();
    let group = groups.get_group_by_id(id).unwrap();

    assert_eq!(group.group_id, id);
    assert_eq!(group.description, "Los Hackers");
    assert_eq!(group.best_participation_id, None);
    assert!(env.reporter.errors().is_empty());
}

#[test]
fn test_create_group_rejects_blank_description() {
    let env = create_test_env();

    assert!(env.state.group_service.create_group("   ").is_none());
    assert_eq!(env.reporter.errors().len(), 1);
    assert_eq!(count_rows(&env.raw_connection(), "groups"), 0);
}

#[test]
fn test_update_group_description_keeps_best_pointer() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Alpha").unwrap();
    let pid = participations.create_participation(gid, 30).unwrap();
    assert!(groups.update_best_participation(gid));

    assert!(groups.update_group_description(gid, "Alpha Prime"));
    let group = groups.get_group_by_id(gid).unwrap();
    assert_eq!(group.description, "Alpha Prime");
    assert_eq!(group.best_participation_id, Some(pid));
}

#[test]
fn test_best_participation_tracks_highest_score() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Alpha").unwrap();
    participations.create_participation(gid, 40).unwrap();
    let top = participations.create_participation(gid, 90).unwrap();
    participations.create_participation(gid, 65).unwrap();

    assert!(groups.update_best_participation(gid));
    assert_eq!(
        groups.get_group_by_id(gid).unwrap().best_participation_id,
        Some(top)
    );

    // 删除最高分后重算，指针移到次高分
    assert!(participations.delete_participation(top));
    assert!(groups.update_best_participation(gid));
    let best = groups.get_group_by_id(gid).unwrap().best_participation_id;
    let best = participations.get_participation_by_id(best.unwrap()).unwrap();
    assert_eq!(best.score, 65);
}

#[test]
fn test_best_participation_tie_prefers_earliest() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Beta").unwrap();
    let first = participations.create_participation(gid, 70).unwrap();
    participations.create_participation(gid, 70).unwrap();

    assert!(groups.update_best_participation(gid));
    assert_eq!(
        groups.get_group_by_id(gid).unwrap().best_participation_id,
        Some(first)
    );
}

#[test]
fn test_best_participation_absent_for_empty_group() {
    let env = create_test_env();
    let groups = &env.state.group_service;

    let gid = groups.create_group("Gamma").unwrap();
    assert!(groups.update_best_participation(gid));
    assert_eq!(groups.get_group_by_id(gid).unwrap().best_participation_id, None);
}

#[test]
fn test_update_best_participation_unknown_group_reported() {
    let env = create_test_env();

    assert!(!env.state.group_service.update_best_participation(404));
    assert_eq!(env.reporter.errors().len(), 1);
}

#[test]
fn test_orphan_participation_rejected_without_write() {
    let env = create_test_env();
    let participations = &env.state.participation_service;

    assert!(participations.create_participation(999, 50).is_none());
    assert!(participations.create_event_participation(1, 999, 50).is_none());

    assert_eq!(count_rows(&env.raw_connection(), "participations"), 0);
    let errors = env.reporter.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.contains("999")));
}

#[test]
fn test_update_participation_moves_score() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Delta").unwrap();
    let pid = participations.create_participation(gid, 10).unwrap();

    assert_eq!(participations.update_participation(pid, gid, 99), Some(gid));
    assert_eq!(participations.get_participation_by_id(pid).unwrap().score, 99);

    // 目标小组不存在：拒绝且不修改
    assert_eq!(participations.update_participation(pid, 777, 1), None);
    assert_eq!(participations.get_participation_by_id(pid).unwrap().score, 99);

    // 记录不存在：报告错误
    assert_eq!(participations.update_participation(12345, gid, 1), None);
    assert_eq!(env.reporter.errors().len(), 2);
}

#[test]
fn test_move_participation_between_groups_recomputes_both() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let alpha = groups.create_group("Alpha").unwrap();
    let beta = groups.create_group("Beta").unwrap();
    let pid = participations.create_participation(alpha, 40).unwrap();
    assert!(groups.update_best_participation(alpha));
    assert_eq!(
        groups.get_group_by_id(alpha).unwrap().best_participation_id,
        Some(pid)
    );

    let previous = participations.update_participation(pid, beta, 10).unwrap();
    assert_eq!(previous, alpha);
    assert!(groups.update_best_participation(beta));
    assert!(groups.update_best_participation(previous));

    assert_eq!(groups.get_group_by_id(alpha).unwrap().best_participation_id, None);
    assert_eq!(
        groups.get_group_by_id(beta).unwrap().best_participation_id,
        Some(pid)
    );
    assert_eq!(participations.get_participation_by_id(pid).unwrap().group_id, beta);
}

#[test]
fn test_delete_twice_is_idempotent() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Epsilon").unwrap();
    let pid = participations.create_participation(gid, 5).unwrap();

    assert!(participations.delete_participation(pid));
    assert!(participations.delete_participation(pid));
    assert!(groups.delete_group(gid));
    assert!(groups.delete_group(gid));

    assert!(env.reporter.errors().is_empty());
    assert!(groups.get_group_by_id(gid).is_none());
}

#[test]
fn test_delete_group_with_participations_is_rejected() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Zeta").unwrap();
    participations.create_participation(gid, 20).unwrap();

    assert!(!groups.delete_group(gid));
    assert!(groups.get_group_by_id(gid).is_some());
    assert_eq!(env.reporter.errors().len(), 1);

    // 显式级联删除
    assert!(groups.delete_group_with_participations(gid));
    let conn = env.raw_connection();
    assert_eq!(count_rows(&conn, "groups"), 0);
    assert_eq!(count_rows(&conn, "participations"), 0);
}

#[test]
fn test_failed_cascade_delete_rolls_back() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let gid = groups.create_group("Eta").unwrap();
    participations.create_participation(gid, 1).unwrap();
    participations.create_participation(gid, 2).unwrap();

    env.raw_connection()
        .execute_batch(
            "CREATE TRIGGER fail_group_delete BEFORE DELETE ON groups
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
        )
        .unwrap();

    assert!(!groups.delete_group_with_participations(gid));

    // 第一条语句（删除参赛记录）已执行，但整体回滚
    let conn = env.raw_connection();
    assert_eq!(count_rows(&conn, "groups"), 1);
    assert_eq!(count_rows(&conn, "participations"), 2);
    assert!(matches!(env.reporter.reports().last(), Some(Report::Error(_))));
}

#[test]
fn test_export_classification_is_deterministic() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let alpha = groups.create_group("Alpha").unwrap();
    let beta = groups.create_group("Beta").unwrap();
    participations.create_event_participation(2, alpha, 50).unwrap();
    participations.create_event_participation(1, beta, 80).unwrap();
    participations.create_event_participation(1, alpha, 95).unwrap();
    participations.create_event_participation(2, beta, 50).unwrap();

    let out = env.path("out/clasificacion.txt");
    assert!(participations.export_classification(groups.as_ref(), &out));
    let first = fs::read_to_string(&out).unwrap();

    let expected = "CTF: 1\n\
                    1. Alpha (95 分)\n\
                    2. Beta (80 分)\n\
                    \n\
                    CTF: 2\n\
                    1. Alpha (50 分)\n\
                    2. Beta (50 分)\n\
                    \n";
    assert_eq!(first, expected);

    // 再次导出覆盖原文件，内容不变
    assert!(participations.export_classification(groups.as_ref(), &out));
    assert_eq!(fs::read_to_string(&out).unwrap(), first);
}

#[test]
fn test_export_keeps_participations_without_event_apart() {
    let env = create_test_env();
    let groups = &env.state.group_service;
    let participations = &env.state.participation_service;

    let alpha = groups.create_group("Alpha").unwrap();
    let beta = groups.create_group("Beta").unwrap();
    let loose = participations.create_participation(alpha, 10).unwrap();
    participations.create_event_participation(loose, beta, 20).unwrap();

    let out = env.path("clasificacion.txt");
    assert!(participations.export_classification(groups.as_ref(), &out));

    let text = fs::read_to_string(&out).unwrap();
    let expected = format!(
        "CTF: {id}\n1. Beta (20 分)\n\nCTF: - (#{id})\n1. Alpha (10 分)\n\n",
        id = loose
    );
    assert_eq!(text, expected);
}

#[test]
fn test_export_failure_is_reported() {
    let env = create_test_env();
    let participations = &env.state.participation_service;

    // 目标路径是目录，写入失败
    let target = env.path("as_dir");
    fs::create_dir_all(&target).unwrap();

    assert!(!participations.export_classification(env.state.group_service.as_ref(), &target));
    assert_eq!(env.reporter.errors().len(), 1);
}
