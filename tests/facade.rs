use bytes::Bytes;
use respline::cmd::{Position, ScoreBound, SetCmd, SetCondition};
use respline::{Client, ClientConfig, Command, Error, KeyType, Reply};
use tokio_test::io::{Builder, Mock};

const SELECT_0: &[u8] = b"*2\r\n$6\r\nSELECT\r\n$1\r\n0\r\n";

fn step(request: Command, reply: &'static [u8]) -> (Command, &'static [u8]) {
    (request, reply)
}

/// A client whose stream expects each request in turn and answers it with
/// the paired reply.
async fn scripted(script: Vec<(Command, &'static [u8])>) -> Client<Mock> {
    let mut builder = Builder::new();
    builder.write(SELECT_0).read(b"+OK\r\n");
    for (request, reply) in &script {
        builder.write(&request.to_bytes()).read(reply);
    }
    Client::with_stream(builder.build(), ClientConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_set_then_get_missing() {
    let mut builder = Builder::new();
    builder
        .write(SELECT_0)
        .read(b"+OK\r\n")
        .write(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n")
        .read(b"+OK\r\n")
        .write(b"*2\r\n$3\r\nGET\r\n$7\r\nmissing\r\n")
        .read(b"$-1\r\n");
    let mut client = Client::with_stream(builder.build(), ClientConfig::default())
        .await
        .unwrap();

    client.set("foo", "bar").await.unwrap();
    assert_eq!(client.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_binary_values() {
    let value = Bytes::from_static(b"\0\r\n\xff");
    let mut client = scripted(vec![
        step(
            Command::new("SET").arg("bin").arg(&value),
            b"+OK\r\n",
        ),
        step(Command::new("GET").arg("bin"), b"$4\r\n\0\r\n\xff\r\n"),
    ])
    .await;

    client.set("bin", &value).await.unwrap();
    assert_eq!(client.get("bin").await.unwrap(), Some(value));
}

#[tokio::test]
async fn test_server_error_is_returned_not_fatal() {
    let mut client = scripted(vec![
        step(
            Command::new("INCR").arg("name"),
            b"-ERR value is not an integer or out of range\r\n",
        ),
        step(Command::new("PING"), b"+PONG\r\n"),
    ])
    .await;

    let err = client.incr("name").await.unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg.starts_with("ERR value")));
    assert!(client.is_connected());
    assert_eq!(client.ping(None).await.unwrap(), Bytes::from("PONG"));
}

#[tokio::test]
async fn test_conditional_set() {
    let mut client = scripted(vec![
        step(
            Command::new("SET").args(["k", "v", "NX"]),
            b"$-1\r\n",
        ),
        step(
            Command::new("SET").args(["k", "v", "XX"]),
            b"+OK\r\n",
        ),
    ])
    .await;

    let nx = SetCmd::new("k", "v").condition(SetCondition::IfAbsent);
    assert!(!client.set_with(nx).await.unwrap());
    let xx = SetCmd::new("k", "v").condition(SetCondition::IfPresent);
    assert!(client.set_with(xx).await.unwrap());
}

#[tokio::test]
async fn test_mget_keeps_missing_keys() {
    let mut client = scripted(vec![step(
        Command::new("MGET").args(["a", "b", "c"]),
        b"*3\r\n$1\r\n1\r\n$-1\r\n$1\r\n3\r\n",
    )])
    .await;

    assert_eq!(
        client.mget(&["a", "b", "c"]).await.unwrap(),
        vec![Some(Bytes::from("1")), None, Some(Bytes::from("3"))]
    );
}

#[tokio::test]
async fn test_blocking_pop() {
    let mut client = scripted(vec![
        step(
            Command::new("BLPOP").args(["jobs", "urgent", "5"]),
            b"*2\r\n$6\r\nurgent\r\n$4\r\njob1\r\n",
        ),
        step(Command::new("BRPOP").args(["jobs", "0"]), b"*-1\r\n"),
    ])
    .await;

    assert_eq!(
        client.blpop(&["jobs", "urgent"], 5).await.unwrap(),
        Some((Bytes::from("urgent"), Bytes::from("job1")))
    );
    assert_eq!(client.brpop(&["jobs"], 0).await.unwrap(), None);
}

#[tokio::test]
async fn test_linsert() {
    let mut client = scripted(vec![
        step(
            Command::new("LINSERT").args(["list", "BEFORE", "b", "a"]),
            b":3\r\n",
        ),
        step(
            Command::new("LINSERT").args(["list", "AFTER", "zzz", "c"]),
            b":-1\r\n",
        ),
    ])
    .await;

    assert_eq!(
        client.linsert("list", Position::Before, "b", "a").await.unwrap(),
        3
    );
    assert_eq!(
        client.linsert("list", Position::After, "zzz", "c").await.unwrap(),
        -1
    );
}

#[tokio::test]
async fn test_hgetall() {
    let mut client = scripted(vec![step(
        Command::new("HGETALL").arg("user:1"),
        b"*4\r\n$4\r\nname\r\n$3\r\nJoe\r\n$6\r\nsalary\r\n$4\r\n2000\r\n",
    )])
    .await;

    assert_eq!(
        client.hgetall("user:1").await.unwrap(),
        vec![
            (Bytes::from("name"), Bytes::from("Joe")),
            (Bytes::from("salary"), Bytes::from("2000")),
        ]
    );
}

#[tokio::test]
async fn test_key_type_and_ttl() {
    let mut client = scripted(vec![
        step(Command::new("TYPE").arg("board"), b"+zset\r\n"),
        step(Command::new("TYPE").arg("nothing"), b"+none\r\n"),
        step(Command::new("TTL").arg("board"), b":-1\r\n"),
    ])
    .await;

    assert_eq!(client.key_type("board").await.unwrap(), KeyType::ZSet);
    assert_eq!(client.key_type("nothing").await.unwrap(), KeyType::None);
    assert_eq!(client.ttl("board").await.unwrap(), -1);
}

#[tokio::test]
async fn test_sorted_set_ranges() {
    let mut client = scripted(vec![
        step(
            Command::new("ZADD").args(["board", "1.5", "ann", "3", "bob"]),
            b":2\r\n",
        ),
        step(
            Command::new("ZRANGE").args(["board", "0", "-1", "WITHSCORES"]),
            b"*4\r\n$3\r\nann\r\n$3\r\n1.5\r\n$3\r\nbob\r\n$1\r\n3\r\n",
        ),
        step(
            Command::new("ZRANGEBYSCORE").args(["board", "(1.5", "+inf", "LIMIT", "0", "1"]),
            b"*1\r\n$3\r\nbob\r\n",
        ),
        step(Command::new("ZSCORE").args(["board", "eve"]), b"$-1\r\n"),
        step(Command::new("ZRANK").args(["board", "bob"]), b":1\r\n"),
    ])
    .await;

    assert_eq!(
        client
            .zadd("board", &[(1.5, "ann"), (3.0, "bob")])
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        client.zrange_withscores("board", 0, -1).await.unwrap(),
        vec![(Bytes::from("ann"), 1.5), (Bytes::from("bob"), 3.0)]
    );
    assert_eq!(
        client
            .zrangebyscore(
                "board",
                ScoreBound::Exclusive(1.5),
                ScoreBound::PosInfinity,
                Some((0, 1))
            )
            .await
            .unwrap(),
        vec![Bytes::from("bob")]
    );
    assert_eq!(client.zscore("board", "eve").await.unwrap(), None);
    assert_eq!(client.zrank("board", "bob").await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_sets() {
    let mut client = scripted(vec![
        step(Command::new("SADD").args(["s", "a", "b"]), b":2\r\n"),
        step(Command::new("SISMEMBER").args(["s", "c"]), b":0\r\n"),
        step(
            Command::new("SDIFF").args(["s", "t"]),
            b"*1\r\n$1\r\nb\r\n",
        ),
    ])
    .await;

    assert_eq!(client.sadd("s", &["a", "b"]).await.unwrap(), 2);
    assert!(!client.sismember("s", "c").await.unwrap());
    assert_eq!(
        client.sdiff(&["s", "t"]).await.unwrap(),
        vec![Bytes::from("b")]
    );
}

#[tokio::test]
async fn test_transaction() {
    let mut client = scripted(vec![
        step(Command::new("MULTI"), b"+OK\r\n"),
        step(Command::new("INCR").arg("n"), b"+QUEUED\r\n"),
        step(Command::new("GET").arg("n"), b"+QUEUED\r\n"),
        step(Command::new("EXEC"), b"*2\r\n:1\r\n$1\r\n1\r\n"),
        step(Command::new("WATCH").arg("n"), b"+OK\r\n"),
        step(Command::new("MULTI"), b"+OK\r\n"),
        step(Command::new("EXEC"), b"*-1\r\n"),
    ])
    .await;

    client.multi().await.unwrap();
    let queued = client.execute(&Command::new("INCR").arg("n")).await.unwrap();
    assert_eq!(queued, Reply::Status("QUEUED".into()));
    client.execute(&Command::new("GET").arg("n")).await.unwrap();
    assert_eq!(
        client.exec().await.unwrap(),
        Some(vec![Reply::Integer(1), Reply::BulkString(Some("1".into()))])
    );

    client.watch(&["n"]).await.unwrap();
    client.multi().await.unwrap();
    assert_eq!(client.exec().await.unwrap(), None);
}

#[tokio::test]
async fn test_server_commands() {
    let mut client = scripted(vec![
        step(
            Command::new("TIME"),
            b"*2\r\n$10\r\n1700000000\r\n$6\r\n123456\r\n",
        ),
        step(
            Command::new("CONFIG").args(["GET", "maxmemory*"]),
            b"*2\r\n$9\r\nmaxmemory\r\n$1\r\n0\r\n",
        ),
        step(Command::new("SLAVEOF").args(["NO", "ONE"]), b"+OK\r\n"),
        step(Command::new("DBSIZE"), b":42\r\n"),
    ])
    .await;

    assert_eq!(client.time().await.unwrap(), (1_700_000_000, 123_456));
    assert_eq!(
        client.config_get("maxmemory*").await.unwrap(),
        vec![("maxmemory".to_string(), Bytes::from("0"))]
    );
    client.slaveof(None).await.unwrap();
    assert_eq!(client.dbsize().await.unwrap(), 42);
}

#[tokio::test]
async fn test_unexpected_reply_keeps_session() {
    let mut client = scripted(vec![
        step(Command::new("LLEN").arg("l"), b"+OK\r\n"),
        step(Command::new("LLEN").arg("l"), b":0\r\n"),
    ])
    .await;

    assert!(matches!(
        client.llen("l").await,
        Err(Error::UnexpectedReply(_))
    ));
    assert_eq!(client.llen("l").await.unwrap(), 0);
}
