// End-to-end tests: a real listener in a temp dir driven through `Client`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scriptpad_core::DocumentOptions;
use scriptpad_protocol::{
    Client, Command, ErrorCode, FileRef, Payload, Reply, Request, Specifier, DEFAULT_MAX_FRAME_BYTES,
};
use scriptpad_service::{Registry, Server, Service};

const TEST_FILE: &str = "//**EXAMPLE FILE**\n\nint main() {\n\treturn 0;\n}\n";
const ALICE: &str = "CHAPTER I.\nDown the Rabbit-Hole\n\nAlice was beginning to get very tired of sitting by her sister\n";

struct Harness {
    dir: tempfile::TempDir,
    socket: PathBuf,
}

impl Harness {
    fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("scriptpad.sock");
        let service = Service::new(Arc::new(Registry::new(DocumentOptions::default())));
        let server = Server::bind(&socket, service, DEFAULT_MAX_FRAME_BYTES).unwrap();
        thread::spawn(move || server.run());
        Self { dir, socket }
    }

    fn client(&self) -> Client {
        Client::connect(&self.socket)
            .unwrap()
            .with_timeout(Duration::from_secs(10))
            .unwrap()
    }

    fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

fn open(client: &mut Client, path: &Path) -> i64 {
    let reply = client
        .send(&Request::new(
            Command::Create,
            vec![Specifier::property("Editor").with_name(path.to_string_lossy())],
        ))
        .unwrap();
    reply.result().and_then(Payload::as_int).unwrap()
}

fn text(reply: Reply) -> String {
    reply.result().and_then(Payload::as_str).unwrap().to_string()
}

fn undo(client: &mut Client) {
    assert_eq!(client.execute("Undo").unwrap(), Reply::empty());
}

#[test]
fn test_scripted_session_over_socket() {
    let harness = Harness::start();
    let path = harness.write_file("test_file", TEST_FILE);
    let mut client = harness.client();

    assert_eq!(open(&mut client, &path), 0);

    let reply = client
        .send(&Request::for_selected(
            Command::Set,
            Specifier::property("Selection").with_index(2).with_range(8),
        ))
        .unwrap();
    assert!(reply.is_success());
    assert_eq!(text(client.get(Specifier::property("Selection")).unwrap()), "**EXAMPL");

    let line = Specifier::property("Line").with_index(2);
    client.set(line.clone(), "\t\tThis is a new line\n").unwrap();
    assert_eq!(text(client.get(line.clone()).unwrap()), "\t\tThis is a new line\n");
    undo(&mut client);
    assert_eq!(text(client.get(line).unwrap()), "int main() {\n");

    client
        .set(Specifier::property("Text").with_index(12), "**NEW TEXT**")
        .unwrap();
    client
        .send(&Request::for_selected(
            Command::Set,
            Specifier::property("Selection").with_index(12).with_range(12),
        ))
        .unwrap();
    assert_eq!(text(client.get(Specifier::property("Selection")).unwrap()), "**NEW TEXT**");
    undo(&mut client);

    client.set(Specifier::property("Text"), "\n**NEW LINE**").unwrap();
    let count = client
        .send(&Request::for_selected(Command::Count, Specifier::property("Line")))
        .unwrap()
        .result()
        .and_then(Payload::as_int)
        .unwrap();
    let last = Specifier::property("Line").with_index(count - 1);
    assert_eq!(text(client.get(last).unwrap()), "**NEW LINE**");
    undo(&mut client);

    assert_eq!(text(client.get(Specifier::property("Text")).unwrap()), TEST_FILE);
    assert_eq!(
        client.get(Specifier::property("Ref")).unwrap().result(),
        Some(&Payload::Ref(FileRef {
            path: path.to_string_lossy().into_owned()
        }))
    );
}

#[test]
fn test_chapter_heading_selection() {
    let harness = Harness::start();
    let path = harness.write_file("alice.txt", ALICE);
    let mut client = harness.client();
    open(&mut client, &path);

    client
        .send(&Request::for_selected(
            Command::Set,
            Specifier::property("Selection").with_index(0).with_range(9),
        ))
        .unwrap();
    assert_eq!(text(client.get(Specifier::property("Selection")).unwrap()), "CHAPTER I");
    assert_eq!(text(client.get(Specifier::property("Symbol")).unwrap()), "I");
}

#[test]
fn test_errors_keep_connection_usable() {
    let harness = Harness::start();
    let path = harness.write_file("alice.txt", ALICE);
    let mut client = harness.client();
    open(&mut client, &path);

    let reply = client.get(Specifier::property("Undo")).unwrap();
    assert!(matches!(reply, Reply::NotUnderstood { .. }));

    let reply = client.get(Specifier::property("Line").with_index(99)).unwrap();
    assert_eq!(reply.error_code(), Some(ErrorCode::OutOfRange));

    let reply = client
        .send(&Request::new(
            Command::Get,
            vec![Specifier::property("Line").with_index(0), Specifier::editor(3)],
        ))
        .unwrap();
    assert_eq!(reply.error_code(), Some(ErrorCode::NotFound));

    assert_eq!(text(client.get(Specifier::property("Line").with_index(0)).unwrap()), "CHAPTER I.\n");
}

#[test]
fn test_editors_shared_across_connections() {
    let harness = Harness::start();
    let first = harness.write_file("first.txt", "first\n");
    let second = harness.write_file("second.txt", "second\n");

    let mut a = harness.client();
    let mut b = harness.client();
    assert_eq!(open(&mut a, &first), 0);
    assert_eq!(open(&mut b, &second), 1);

    let reply = a
        .send(&Request::new(Command::Count, vec![Specifier::property("Editor")]))
        .unwrap();
    assert_eq!(reply.result(), Some(&Payload::Int(2)));

    // The most recently created editor is selected for everyone.
    assert_eq!(text(a.get(Specifier::property("Text")).unwrap()), "second\n");

    let reply = b
        .send(&Request::new(
            Command::Get,
            vec![Specifier::property("Text"), Specifier::editor(0)],
        ))
        .unwrap();
    assert_eq!(text(reply), "first\n");
}

#[test]
fn test_save_round_trip() {
    let harness = Harness::start();
    let path = harness.write_file("notes.txt", "alpha\n");
    let mut client = harness.client();
    open(&mut client, &path);

    client.set(Specifier::property("Text"), "beta\n").unwrap();
    assert!(client.execute("Save").unwrap().is_success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta\n");

    let reply = client.get(Specifier::property("Modified")).unwrap();
    assert!(matches!(
        reply.result(),
        Some(Payload::Modified(state)) if !state.modified && state.can_undo
    ));
}
