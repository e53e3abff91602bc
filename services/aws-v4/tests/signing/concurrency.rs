// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use chrono::Duration;
use http::Method;
use pretty_assertions::assert_eq;
use proxysign_aws_v4::{CredentialCache, SigningKey};
use proxysign_core::time::{format_date, DateTime};
use proxysign_core::RequestContext;

use super::{example_signer, example_time, init_signing_test, SECRET_KEY};

const WORKERS: usize = 16;
const ROUNDS: usize = 200;

#[test]
fn test_shared_signer_same_day() -> Result<()> {
    init_signing_test();

    let signer = Arc::new(example_signer());
    let ctx = RequestContext::new(Method::GET, "/test.txt").with_timestamp(example_time());
    let expected = signer.sign(&ctx)?.expect("signing is enabled");
    let expected = expected.get("authorization").unwrap().clone();

    thread::scope(|s| {
        for _ in 0..WORKERS {
            let signer = signer.clone();
            let ctx = ctx.clone();
            let expected = expected.clone();
            s.spawn(move || {
                for _ in 0..ROUNDS {
                    let headers = signer
                        .sign(&ctx)
                        .expect("sign must succeed")
                        .expect("signing is enabled");
                    assert_eq!(headers.get("authorization").unwrap(), &expected);
                }
            });
        }
    });

    Ok(())
}

#[test]
fn test_cache_across_day_boundary() -> Result<()> {
    init_signing_test();

    let before: DateTime = "2015-08-30T23:59:59Z".parse()?;
    let after = before + Duration::seconds(2);

    let mut expected = HashMap::new();
    for t in [before, after] {
        let date = format_date(t);
        let key = SigningKey::derive(SECRET_KEY, &date, "us-east-1", "s3")?;
        expected.insert(date, key.as_bytes().to_vec());
    }

    let cache = CredentialCache::new(SECRET_KEY, "us-east-1", "s3");
    thread::scope(|s| {
        for worker in 0..WORKERS {
            let cache = &cache;
            let expected = &expected;
            s.spawn(move || {
                for round in 0..ROUNDS {
                    let now = if (worker + round) % 2 == 0 { before } else { after };
                    let key = cache.get_signing_key(now).expect("key must be derived");

                    // Key and scope always come from the same derivation.
                    assert_eq!(key.scope().date(), format_date(now));
                    assert_eq!(key.as_bytes(), expected[key.scope().date()].as_slice());
                }
            });
        }
    });

    Ok(())
}
