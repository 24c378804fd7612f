// Wire-level tests: requests and replies crossing a real socket pair.

use std::os::unix::net::UnixStream;

use scriptpad_protocol::{
    read_message, write_message, CaretPosition, Command, ErrorCode, Payload, Reply, Request,
    Specifier, NOT_UNDERSTOOD_WHAT, REPLY_WHAT,
};

const MAX: usize = 64 * 1024;

#[test]
fn test_request_reply_exchange_in_order() {
    let (mut client, mut server) = UnixStream::pair().unwrap();

    let requests = vec![
        Request::for_selected(Command::Set, Specifier::property("Selection").with_index(0).with_range(9)),
        Request::for_selected(Command::Get, Specifier::property("Selection")),
        Request::for_selected(Command::Get, Specifier::property("CaretPosition")),
    ];
    for request in &requests {
        write_message(&mut client, request, MAX).unwrap();
    }

    let replies = vec![
        Reply::empty(),
        Reply::success("CHAPTER I"),
        Reply::success(Payload::Caret(CaretPosition {
            line: 1,
            column: 10,
            offset: 9,
        })),
    ];
    for (expected, reply) in requests.iter().zip(&replies) {
        let received: Request = read_message(&mut server, MAX).unwrap().unwrap();
        assert_eq!(&received, expected);
        write_message(&mut server, reply, MAX).unwrap();
    }

    for expected in &replies {
        let reply: Reply = read_message(&mut client, MAX).unwrap().unwrap();
        assert_eq!(&reply, expected);
    }
}

#[test]
fn test_reply_tags_on_the_wire() {
    let (mut client, mut server) = UnixStream::pair().unwrap();
    write_message(&mut server, &Reply::error(ErrorCode::OutOfRange, "line 40"), MAX).unwrap();
    write_message(&mut server, &Reply::not_understood("Get Undo"), MAX).unwrap();

    let raw: serde_json::Value = read_message(&mut client, MAX).unwrap().unwrap();
    assert_eq!(raw["what"], REPLY_WHAT);
    assert_eq!(raw["error"], -1);

    let raw: serde_json::Value = read_message(&mut client, MAX).unwrap().unwrap();
    assert_eq!(raw["what"], NOT_UNDERSTOOD_WHAT);
    assert!(raw.get("error").is_none());
}

#[test]
fn test_closed_stream_yields_none() {
    let (client, mut server) = UnixStream::pair().unwrap();
    drop(client);
    let next: Option<Request> = read_message(&mut server, MAX).unwrap();
    assert!(next.is_none());
}
