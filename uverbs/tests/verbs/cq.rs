use super::helpers::open_session;
use uverbs::Opcode;
use uverbs::protocol::records::CreateCqCmd;

#[test]
fn test_driver_grants_fewer_entries() {
    let (driver, session) = open_session();
    driver.state().cq_limit = Some(32);

    let cq = session.create_cq(64, 0).unwrap();
    assert_eq!(cq.cqe(), 32);

    let cmd: CreateCqCmd = driver.last_body();
    assert_eq!(cmd.cqe, 64);
}

#[test]
fn test_create_cq_records_request() {
    let (driver, session) = open_session();
    let cq = session.create_cq(128, 0xfeed).unwrap();
    assert_eq!(cq.cqe(), 128);
    assert_eq!(cq.user_handle(), 0xfeed);
    assert_eq!(cq.handle().session(), session.id());

    let cmd: CreateCqCmd = driver.last_body();
    assert_eq!(cmd.user_handle, 0xfeed);
    assert_eq!(cmd.reserved, 0);
    let h = driver.last_header();
    assert_eq!(h.in_words, 8);
    assert_eq!(h.out_words, 2);
}

#[test]
fn test_create_cq_rejected() {
    let (driver, session) = open_session();
    driver.state().reject = Some((Opcode::CreateCq, libc::ENOMEM));
    let err = session.create_cq(16, 0).unwrap_err();
    assert_eq!(err.errno(), libc::ENOMEM);
    assert!(driver.state().cqs.is_empty());
}

#[test]
fn test_create_cq_ext_driver_data() {
    let (driver, session) = open_session();
    session.create_cq_ext(16, 0, &[9; 12]).unwrap();
    assert_eq!(driver.last_header().in_words, 11);
    assert_eq!(
        driver.state().driver_data.last(),
        Some(&(Opcode::CreateCq, vec![9; 12]))
    );
}

#[test]
fn test_destroy_cq() {
    let (driver, session) = open_session();
    let cq = session.create_cq(8, 0).unwrap();
    session.destroy_cq(cq).unwrap();
    assert!(driver.state().cqs.is_empty());
    assert_eq!(driver.last_header().command, Opcode::DestroyCq);
    assert_eq!(driver.last_header().out_words, 0);
}
