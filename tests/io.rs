use bufpipe::{pipe, PipeError};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::io::{self, Read, Write};

#[test]
fn sync_reader_writer() {
    let (mut read, mut write) = pipe(4096);

    let sent = std::thread::spawn(move || {
        let mut rng = SmallRng::from_entropy();
        let values: Vec<u8> = (0..1_000_000).map(|_| rng.gen()).collect();
        write.write_all(&values).unwrap();
        seahash::hash(&values)
    });

    let received = std::thread::spawn(move || {
        let mut values = Vec::new();
        read.read_to_end(&mut values).unwrap();
        seahash::hash(&values)
    });

    let sent = sent.join().unwrap();
    let received = received.join().unwrap();
    assert_eq!(sent, received);
}

#[test]
fn read_to_end_stops_at_end_of_stream() {
    let (mut reader, mut writer) = pipe(16);
    writer.write_all(b"hello").unwrap();
    writer.flush().unwrap();
    drop(writer);

    let mut received = String::new();
    reader.read_to_string(&mut received).unwrap();
    assert_eq!(received, "hello");
}

#[test]
fn shared_handles_implement_io() {
    let (reader, writer) = pipe(16);
    (&writer).write_all(b"shared").unwrap();
    writer.close().unwrap();

    let mut received = Vec::new();
    (&reader).read_to_end(&mut received).unwrap();
    assert_eq!(received, b"shared");
}

#[test]
fn io_errors_wrap_pipe_errors() {
    let (mut reader, mut writer) = pipe(16);
    reader
        .close_with_error(PipeError::custom("stop writing"))
        .unwrap();

    let e = Write::write(&mut writer, b"abc").unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::Other);
    assert_eq!(e.to_string(), "stop writing");

    let e = Read::read(&mut reader, &mut [0; 4]).unwrap_err();
    assert!(matches!(PipeError::from(e), PipeError::Custom(_)));

    let (reader, mut writer) = pipe(16);
    drop(reader);
    let e = Write::write(&mut writer, b"abc").unwrap_err();
    assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
    assert!(PipeError::from(e).is_closed());
}

#[test]
fn io_write_reports_partial_progress() {
    let (reader, mut writer) = pipe(2);

    let closer = std::thread::spawn(move || {
        // wait for the writer to fill the buffer
        while reader.buffered() < 2 {
            std::thread::yield_now();
        }
        reader.close().unwrap();
    });

    // the bytes that landed are reported, the failure comes with the next write
    assert_eq!(Write::write(&mut writer, b"hello").unwrap(), 2);
    closer.join().unwrap();
    assert_eq!(
        Write::write(&mut writer, b"llo").unwrap_err().kind(),
        io::ErrorKind::BrokenPipe
    );
}
