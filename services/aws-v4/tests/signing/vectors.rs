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

use anyhow::Result;
use http::Method;
use pretty_assertions::assert_eq;
use proxysign_aws_v4::canonical::canonical_headers;
use proxysign_aws_v4::{signature, AddressingStyle, CanonicalRequest, SignerConfig, SigningKey};
use proxysign_core::hash::hex_sha256;
use proxysign_core::time::{format_date, DateTime};
use proxysign_core::RequestContext;

use super::{example_config, example_signer, example_time, init_signing_test, SECRET_KEY};

#[test]
fn test_example_request_components() -> Result<()> {
    init_signing_test();

    let ctx = RequestContext::new(Method::GET, "/test.txt")
        .with_timestamp(example_time())
        .with_header("host", "examplebucket.s3.amazonaws.com")?
        .with_header("x-amz-date", "20150830T123600Z")?;

    let creq = CanonicalRequest::build(
        &ctx,
        "examplebucket",
        "s3.amazonaws.com",
        AddressingStyle::VirtualHosted,
    )?;
    let creq_string = creq.to_canonical_string()?;
    assert_eq!(
        creq_string,
        "GET\n/test.txt\n\nhost:examplebucket.s3.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\nUNSIGNED-PAYLOAD"
    );
    assert_eq!(
        hex_sha256(creq_string.as_bytes()),
        "3893d468028a9b002b4a35bb04ed012118ffb54113eca4a3e57ff3bb7fab60dd"
    );

    let date = format_date(example_time());
    let key = SigningKey::derive(SECRET_KEY, &date, "us-east-1", "s3")?;
    assert_eq!(
        key.scope().as_str(),
        "20150830/us-east-1/s3/aws4_request"
    );

    let sig = signature::compute(&creq_string, key.as_bytes(), key.scope().as_str(), example_time())?;
    assert_eq!(
        sig,
        "48b096da8da94250c6dc5ddcd3f39deaad9c3ec6b83f7dfe5582355dafe9970f"
    );

    Ok(())
}

#[test]
fn test_example_request_signed() -> Result<()> {
    init_signing_test();

    let ctx = RequestContext::new(Method::GET, "/test.txt").with_timestamp(example_time());
    let headers = example_signer()
        .sign(&ctx)?
        .expect("signing is enabled");

    let names = headers
        .iter()
        .map(|h| h.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["authorization", "x-amz-date", "x-amz-content-sha256", "host"]
    );
    assert_eq!(
        headers.get("authorization").unwrap(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=b928d22c42cf558fca54d4fcc1783eb19ff4db2fb61fe6168f694d7e5c639a4b"
    );
    assert_eq!(headers.get("x-amz-date").unwrap(), "20150830T123600Z");
    assert_eq!(headers.get("host").unwrap(), "examplebucket.s3.amazonaws.com");

    Ok(())
}

#[test]
fn test_path_style_with_query() -> Result<()> {
    init_signing_test();

    let signer = proxysign_aws_v4::Signer::new(SignerConfig {
        addressing: AddressingStyle::Path,
        ..example_config()
    });
    let ctx = RequestContext::new(Method::GET, "/photos/2015%20summer.jpg")
        .with_timestamp(example_time())
        .with_query("prefix", "a b/c")
        .with_query("list-type", "2");

    let headers = signer.sign(&ctx)?.expect("signing is enabled");
    assert_eq!(
        headers.get("authorization").unwrap(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=7dfa7de9d4d521622307d7f18a5b2bd043b468c4ed615fdba8cada079aecd222"
    );
    assert_eq!(headers.get("host").unwrap(), "s3.amazonaws.com");

    Ok(())
}

#[test]
fn test_client_host_is_replaced() -> Result<()> {
    let ctx = RequestContext::new(Method::HEAD, "/test.txt")
        .with_timestamp(example_time())
        .with_header("host", "proxy.example.com")?;

    let headers = example_signer().sign(&ctx)?.expect("signing is enabled");
    assert_eq!(headers.len(), 4);
    assert_eq!(headers.get("host").unwrap(), "examplebucket.s3.amazonaws.com");

    // At the component level an explicit host is signed as given.
    let (block, signed) = canonical_headers(&ctx.headers, "proxy.example.com")?;
    assert_eq!(block, "host:proxy.example.com\n");
    assert_eq!(signed, "host");

    Ok(())
}

#[test]
fn test_signature_changes_with_day() -> Result<()> {
    let signer = example_signer();
    let next_day: DateTime = "2015-08-31T00:00:00Z".parse()?;

    let ctx = RequestContext::new(Method::GET, "/test.txt").with_timestamp(next_day);
    let headers = signer.sign(&ctx)?.expect("signing is enabled");
    assert_eq!(
        headers.get("authorization").unwrap(),
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150831/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=8cc8ab5978a28d89130f39f660b782d5691a5376a9658d21803acbdcbb6a20e5"
    );

    Ok(())
}
