use super::helpers::{QPN_BASE, SimDriver, open_session, session_on};
use uverbs::protocol::records::CreateQpCmd;
use uverbs::{
    AccessFlags, AhAttr, CompletionQueue, Gid, GlobalRoute, Mtu, Opcode, ProtectionDomain,
    QpAttr, QpAttrMask, QpCap, QpInitAttr, QpState, QpType, QueuePair, Session, VerbsError,
};

fn rc_init<'a>(send_cq: &'a CompletionQueue, recv_cq: &'a CompletionQueue) -> QpInitAttr<'a> {
    QpInitAttr {
        send_cq,
        recv_cq,
        cap: QpCap {
            max_send_wr: 64,
            max_recv_wr: 32,
            max_send_sge: 2,
            max_recv_sge: 1,
            max_inline_data: 64,
        },
        qp_type: QpType::Rc,
        sq_sig_all: true,
        user_handle: 0xabc,
    }
}

fn rc_qp(session: &Session) -> (ProtectionDomain, CompletionQueue, CompletionQueue, QueuePair) {
    let pd = session.alloc_pd().unwrap();
    let scq = session.create_cq(64, 1).unwrap();
    let rcq = session.create_cq(64, 2).unwrap();
    let qp = session.create_qp(&pd, &rc_init(&scq, &rcq)).unwrap();
    (pd, scq, rcq, qp)
}

fn path(dlid: u16, gid_tail: u8, port_num: u8) -> AhAttr {
    let mut raw = [0xfe; 16];
    raw[15] = gid_tail;
    AhAttr {
        grh: GlobalRoute {
            dgid: Gid::new(raw),
            flow_label: 0xbeef,
            sgid_index: 1,
            hop_limit: 255,
            traffic_class: 0x10,
        },
        dlid,
        sl: 3,
        src_path_bits: 0,
        static_rate: 0,
        is_global: true,
        port_num,
    }
}

#[test]
fn test_create_qp() {
    let (driver, session) = open_session();
    let (pd, scq, rcq, qp) = rc_qp(&session);

    assert_eq!(qp.qp_num(), QPN_BASE + qp.handle().raw());
    assert_eq!(qp.pd(), pd.handle());
    assert_eq!(qp.send_cq(), scq.handle());
    assert_eq!(qp.recv_cq(), rcq.handle());
    assert_eq!(qp.qp_type(), QpType::Rc);

    let cmd: CreateQpCmd = driver.last_body();
    assert_eq!(cmd.user_handle, 0xabc);
    assert_eq!(cmd.pd_handle, pd.handle().raw());
    assert_eq!(cmd.send_cq_handle, scq.handle().raw());
    assert_eq!(cmd.recv_cq_handle, rcq.handle().raw());
    assert_eq!(cmd.srq_handle, 0);
    assert_eq!(cmd.is_srq, 0);
    assert_eq!(cmd.max_send_wr, 64);
    assert_eq!(cmd.max_recv_wr, 32);
    assert_eq!(cmd.max_send_sge, 2);
    assert_eq!(cmd.max_recv_sge, 1);
    assert_eq!(cmd.max_inline_data, 64);
    assert_eq!(cmd.sq_sig_all, 1);
    assert_eq!(cmd.qp_type, 2);

    let h = driver.last_header();
    assert_eq!(h.in_words, 16);
    assert_eq!(h.out_words, 2);
}

#[test]
fn test_create_qp_with_foreign_cq() {
    let (_, owner) = open_session();
    let driver = SimDriver::new();
    let mut session = session_on(&driver);
    session.init(0).unwrap();

    let pd = session.alloc_pd().unwrap();
    let local_cq = session.create_cq(8, 0).unwrap();
    let foreign_cq = owner.create_cq(8, 0).unwrap();
    let before = driver.state().requests.len();

    let err = session
        .create_qp(&pd, &rc_init(&local_cq, &foreign_cq))
        .unwrap_err();
    assert!(matches!(err, VerbsError::ForeignHandle { kind: "cq", .. }));
    assert_eq!(driver.state().requests.len(), before);
}

#[test]
fn test_create_qp_ext_driver_data() {
    let (driver, session) = open_session();
    let pd = session.alloc_pd().unwrap();
    let cq = session.create_cq(8, 0).unwrap();
    session
        .create_qp_ext(&pd, &rc_init(&cq, &cq), &[1, 2, 3, 4, 5, 6, 7, 8])
        .unwrap();
    assert_eq!(driver.last_header().in_words, 18);
    assert_eq!(
        driver.state().driver_data.last(),
        Some(&(Opcode::CreateQp, vec![1, 2, 3, 4, 5, 6, 7, 8]))
    );
}

#[test]
fn test_modify_sends_full_paths_under_any_mask() {
    let (driver, session) = open_session();
    let (_pd, _scq, _rcq, qp) = rc_qp(&session);

    let attr = QpAttr {
        qp_state: QpState::Init,
        ah_attr: path(0x11, 0xaa, 1),
        alt_ah_attr: path(0x22, 0xbb, 2),
        ..Default::default()
    };

    for mask in [
        QpAttrMask::STATE,
        QpAttrMask::AV,
        QpAttrMask::ALT_PATH,
        QpAttrMask::empty(),
    ] {
        session.modify_qp(&qp, &attr, mask).unwrap();
        let sent = *driver.state().modifies.last().unwrap();
        assert_eq!(sent.attr_mask, mask.bits());
        assert_eq!(sent.qp_handle, qp.handle().raw());

        assert_eq!(sent.dest.dgid, attr.ah_attr.grh.dgid.raw);
        assert_eq!(sent.dest.flow_label, 0xbeef);
        assert_eq!(sent.dest.dlid, 0x11);
        assert_eq!(sent.dest.sgid_index, 1);
        assert_eq!(sent.dest.hop_limit, 255);
        assert_eq!(sent.dest.traffic_class, 0x10);
        assert_eq!(sent.dest.sl, 3);
        assert_eq!(sent.dest.is_global, 1);
        assert_eq!(sent.dest.port_num, 1);

        assert_eq!(sent.alt_dest.dgid, attr.alt_ah_attr.grh.dgid.raw);
        assert_eq!(sent.alt_dest.dlid, 0x22);
        assert_eq!(sent.alt_dest.port_num, 2);
    }

    let h = driver.last_header();
    assert_eq!(h.command, Opcode::ModifyQp);
    assert_eq!(h.in_words, 30);
    assert_eq!(h.out_words, 0);
}

#[test]
fn test_modify_qp_ext_driver_data() {
    let (driver, session) = open_session();
    let (_pd, _scq, _rcq, qp) = rc_qp(&session);
    let attr = QpAttr {
        qp_state: QpState::Init,
        ..Default::default()
    };

    session
        .modify_qp_ext(&qp, &attr, QpAttrMask::STATE, &[0xa5; 6])
        .unwrap();

    let h = driver.last_header();
    assert_eq!(h.command, Opcode::ModifyQp);
    assert_eq!(h.in_words, 32);
    assert_eq!(h.out_words, 0);
    let state = driver.state();
    assert_eq!(state.modifies.last().unwrap().qp_state, 1);
    assert_eq!(
        state.driver_data.last(),
        Some(&(Opcode::ModifyQp, vec![0xa5, 0xa5, 0xa5, 0xa5, 0xa5, 0xa5, 0, 0]))
    );
}

#[test]
fn test_connect_sequence() {
    let (driver, session) = open_session();
    let (_pd, _scq, _rcq, qp) = rc_qp(&session);

    let to_init = QpAttr {
        qp_state: QpState::Init,
        pkey_index: 0,
        port_num: 1,
        qp_access_flags: AccessFlags::REMOTE_READ | AccessFlags::REMOTE_WRITE,
        ..Default::default()
    };
    session
        .modify_qp(
            &qp,
            &to_init,
            QpAttrMask::STATE | QpAttrMask::PKEY_INDEX | QpAttrMask::PORT | QpAttrMask::ACCESS_FLAGS,
        )
        .unwrap();

    let to_rtr = QpAttr {
        qp_state: QpState::Rtr,
        path_mtu: Some(Mtu::Mtu4096),
        dest_qp_num: 0x4242,
        rq_psn: 100,
        max_dest_rd_atomic: 4,
        min_rnr_timer: 12,
        ah_attr: path(0x33, 1, 1),
        ..Default::default()
    };
    session
        .modify_qp(
            &qp,
            &to_rtr,
            QpAttrMask::STATE
                | QpAttrMask::AV
                | QpAttrMask::PATH_MTU
                | QpAttrMask::DEST_QPN
                | QpAttrMask::RQ_PSN
                | QpAttrMask::MAX_DEST_RD_ATOMIC
                | QpAttrMask::MIN_RNR_TIMER,
        )
        .unwrap();

    let to_rts = QpAttr {
        qp_state: QpState::Rts,
        sq_psn: 200,
        timeout: 14,
        retry_cnt: 7,
        rnr_retry: 7,
        max_rd_atomic: 4,
        ..Default::default()
    };
    session
        .modify_qp(
            &qp,
            &to_rts,
            QpAttrMask::STATE
                | QpAttrMask::SQ_PSN
                | QpAttrMask::TIMEOUT
                | QpAttrMask::RETRY_CNT
                | QpAttrMask::RNR_RETRY
                | QpAttrMask::MAX_QP_RD_ATOMIC,
        )
        .unwrap();

    let state = driver.state();
    let states: Vec<u8> = state.modifies.iter().map(|m| m.qp_state).collect();
    assert_eq!(states, vec![1, 2, 3]);
    assert_eq!(state.modifies[0].qp_access_flags, 0b110);
    assert_eq!(state.modifies[0].port_num, 1);
    assert_eq!(state.modifies[1].path_mtu, 5);
    assert_eq!(state.modifies[1].dest_qp_num, 0x4242);
    assert_eq!(state.modifies[1].rq_psn, 100);
    assert_eq!(state.modifies[1].dest.dlid, 0x33);
    assert_eq!(state.modifies[2].sq_psn, 200);
    assert_eq!(state.modifies[2].timeout, 14);
    assert_eq!(state.modifies[2].retry_cnt, 7);
    assert_eq!(state.modifies[2].max_rd_atomic, 4);
}

#[test]
fn test_modify_rejected_by_driver() {
    let (driver, session) = open_session();
    let (_pd, _scq, _rcq, qp) = rc_qp(&session);
    driver.state().reject = Some((Opcode::ModifyQp, libc::EINVAL));

    let attr = QpAttr {
        qp_state: QpState::Rts,
        ..Default::default()
    };
    let err = session.modify_qp(&qp, &attr, QpAttrMask::STATE).unwrap_err();
    assert_eq!(err.errno(), libc::EINVAL);
    assert_eq!(err.command(), Some(Opcode::ModifyQp));
    assert!(driver.state().modifies.is_empty());
}

#[test]
fn test_teardown_in_reverse_order() {
    let (driver, session) = open_session();
    let (pd, scq, rcq, qp) = rc_qp(&session);

    session.destroy_qp(qp).unwrap();
    session.destroy_cq(rcq).unwrap();
    session.destroy_cq(scq).unwrap();
    session.dealloc_pd(pd).unwrap();

    let state = driver.state();
    assert!(state.qps.is_empty());
    assert!(state.cqs.is_empty());
    assert!(state.pds.is_empty());
}

#[test]
fn test_destroy_qp_failure_hands_back_qp() {
    let (driver, session) = open_session();
    let (_pd, _scq, _rcq, qp) = rc_qp(&session);
    let qpn = qp.qp_num();
    driver.state().reject = Some((Opcode::DestroyQp, libc::EBUSY));

    let err = session.destroy_qp(qp).unwrap_err();
    assert_eq!(err.resource.qp_num(), qpn);
    assert!(err.to_string().contains("DESTROY_QP"));
}
